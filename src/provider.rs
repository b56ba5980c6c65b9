use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueBool, ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider};

use crate::catalog::{
    ExtensionDataSource, FabricDataSource, LogicalNetworkProfileDataSource, OsTemplateDataSource,
    ServerTypeDataSource, SiteDataSource, VmTypeDataSource,
};
use crate::client::{parse_endpoint, Client, ClientHandle, HttpTransport};
use crate::drive::DriveResource;
use crate::extension_instance::ExtensionInstanceResource;
use crate::infrastructure::{InfrastructureDataSource, InfrastructureResource};
use crate::infrastructure_deployer::InfrastructureDeployerResource;
use crate::logical_network::{LogicalNetworkDataSource, LogicalNetworkResource};
use crate::server_instance_group::ServerInstanceGroupResource;
use crate::utils::{flag, optional_string, WithSchema};
use crate::vm_instance_group::VmInstanceGroupResource;

pub const ENDPOINT_ENV: &str = "METALCLOUD_ENDPOINT";
pub const API_KEY_ENV: &str = "METALCLOUD_API_KEY";
pub const USER_EMAIL_ENV: &str = "METALCLOUD_USER_EMAIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub endpoint: ValueString<'a>,
    pub api_key: ValueString<'a>,
    pub user_email: ValueString<'a>,
    pub logging: ValueBool,
}

impl<'a> WithSchema for ProviderConfig<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "endpoint" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!("URL of the MetalCloud API (default: ${ENDPOINT_ENV})")),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "api_key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!("API key used to authenticate (default: ${API_KEY_ENV})")),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "user_email" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!("Email of the user acting on the API (default: ${USER_EMAIL_ENV})")),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "logging" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Log API requests and responses at debug level (default: false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("MetalCloud"),
                ..Default::default()
            },
        }
    }
}

/// Connection settings, once environment fallbacks are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub endpoint: String,
    pub api_key: String,
    pub user_email: Option<String>,
    pub logging: bool,
}

impl Settings {
    pub(crate) fn resolve<F>(diags: &mut Diagnostics, config: &ProviderConfig, env: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |value: &ValueString, var: &str| {
            optional_string(value).or_else(|| env(var).filter(|s| !s.is_empty()))
        };
        let endpoint = lookup(&config.endpoint, ENDPOINT_ENV);
        let api_key = lookup(&config.api_key, API_KEY_ENV);
        let user_email = lookup(&config.user_email, USER_EMAIL_ENV);

        if endpoint.is_none() {
            diags.error(
                "Missing MetalCloud endpoint",
                format!("Set `endpoint` in the provider configuration, or the {ENDPOINT_ENV} environment variable"),
                AttributePath::new("endpoint"),
            );
        }
        if api_key.is_none() {
            diags.error(
                "Missing MetalCloud API key",
                format!("Set `api_key` in the provider configuration, or the {API_KEY_ENV} environment variable"),
                AttributePath::new("api_key"),
            );
        }

        Some(Self {
            endpoint: endpoint?,
            api_key: api_key?,
            user_email,
            logging: flag(&config.logging, false),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct MetalCloudProvider {
    client: ClientHandle,
}

impl MetalCloudProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Provider for MetalCloudProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Some(endpoint) = config.endpoint.as_deref_option() {
            if let Err(err) = parse_endpoint(endpoint) {
                diags.error(
                    "Invalid MetalCloud endpoint",
                    format!("{err:#}"),
                    AttributePath::new("endpoint"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let settings = Settings::resolve(diags, &config, |var| env::var(var).ok())?;

        let transport = match HttpTransport::new(
            &settings.endpoint,
            &settings.api_key,
            settings.user_email.as_deref(),
            settings.logging,
        ) {
            Ok(transport) => transport,
            Err(err) => {
                diags.error(
                    "Invalid MetalCloud endpoint",
                    format!("{err:#}"),
                    AttributePath::new("endpoint"),
                );
                return None;
            }
        };

        info!(
            endpoint = %settings.endpoint,
            terraform_version,
            "Configured MetalCloud provider"
        );
        self.client.set(Client::new(transport));
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "infrastructure" => InfrastructureResource::new(self.client.clone()),
            "infrastructure_deployer" => InfrastructureDeployerResource::new(self.client.clone()),
            "server_instance_group" => ServerInstanceGroupResource::new(self.client.clone()),
            "vm_instance_group" => VmInstanceGroupResource::new(self.client.clone()),
            "drive" => DriveResource::new(self.client.clone()),
            "logical_network" => LogicalNetworkResource::new(self.client.clone()),
            "extension_instance" => ExtensionInstanceResource::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "site" => SiteDataSource::new(self.client.clone()),
            "fabric" => FabricDataSource::new(self.client.clone()),
            "server_type" => ServerTypeDataSource::new(self.client.clone()),
            "vm_type" => VmTypeDataSource::new(self.client.clone()),
            "os_template" => OsTemplateDataSource::new(self.client.clone()),
            "extension" => ExtensionDataSource::new(self.client.clone()),
            "logical_network_profile" => LogicalNetworkProfileDataSource::new(self.client.clone()),
            "infrastructure" => InfrastructureDataSource::new(self.client.clone()),
            "logical_network" => LogicalNetworkDataSource::new(self.client.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn config<'a>(endpoint: Option<&'a str>, api_key: Option<&'a str>) -> ProviderConfig<'a> {
        ProviderConfig {
            endpoint: endpoint.map(ValueString::from).unwrap_or_default(),
            api_key: api_key.map(ValueString::from).unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn explicit_settings_win_over_environment() {
        let mut diags = Diagnostics::default();
        let settings = Settings::resolve(
            &mut diags,
            &config(Some("https://api.example.com"), Some("secret")),
            |var| Some(format!("{var} from env")),
        )
        .unwrap();

        assert_eq!(settings.endpoint, "https://api.example.com");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(
            settings.user_email,
            Some(format!("{USER_EMAIL_ENV} from env"))
        );
        assert!(!settings.logging);
    }

    #[test]
    fn environment_fills_missing_settings() {
        let mut diags = Diagnostics::default();
        let settings = Settings::resolve(&mut diags, &config(None, None), |var| match var {
            ENDPOINT_ENV => Some("https://env.example.com".to_owned()),
            API_KEY_ENV => Some("env-secret".to_owned()),
            _ => None,
        })
        .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(settings.endpoint, "https://env.example.com");
        assert_eq!(settings.api_key, "env-secret");
        assert_eq!(settings.user_email, None);
    }

    #[test]
    fn missing_settings_are_reported() {
        let mut diags = Diagnostics::default();
        let settings = Settings::resolve(&mut diags, &config(None, Some("")), no_env);

        assert!(settings.is_none());
        assert_eq!(diags.errors.len(), 2);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("endpoint"));
        assert_eq!(diags.errors[1].attribute, AttributePath::new("api_key"));
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_validation() {
        let provider = MetalCloudProvider::new();
        let mut diags = Diagnostics::default();
        let validated = Provider::validate(
            &provider,
            &mut diags,
            config(Some("ftp://api.example.com"), Some("secret")),
        )
        .await;

        assert!(validated.is_none());
        assert_eq!(diags.errors[0].attribute, AttributePath::new("endpoint"));
    }

    #[tokio::test]
    async fn configure_shares_client_with_resources() {
        let provider = MetalCloudProvider::new();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).unwrap();
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        assert_eq!(resources.len(), 7);
        assert_eq!(data_sources.len(), 9);
        assert!(provider.client.get().is_none());

        let configured = Provider::configure(
            &provider,
            &mut diags,
            "1.9.0".to_owned(),
            config(Some("https://api.example.com"), Some("secret")),
        )
        .await;

        assert_eq!(configured, Some(()));
        assert!(diags.errors.is_empty());
        assert!(provider.client.get().is_some());
    }

    #[test]
    fn every_resource_has_a_schema() {
        let provider = MetalCloudProvider::new();
        let mut diags = Diagnostics::default();
        for (name, resource) in provider.get_resources(&mut diags).unwrap() {
            assert!(resource.schema(&mut diags).is_some(), "{name}");
        }
        for (name, data_source) in provider.get_data_sources(&mut diags).unwrap() {
            assert!(data_source.schema(&mut diags).is_some(), "{name}");
        }
        assert!(diags.errors.is_empty());
    }
}
