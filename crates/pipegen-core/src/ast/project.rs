//! Host project handle
//!
//! The compiler does not own build logic. Everything it needs from the
//! surrounding project (command lines for install/synth/diff/deploy, the
//! cloud assembly directory, the package namespace) comes through the
//! [`ProjectCommands`] trait. [`ProjectConfig`] is the template-driven
//! implementation loaded from configuration.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the stage name in command templates
pub const STAGE_PLACEHOLDER: &str = "{stage}";

/// Placeholder replaced by the package reference in command templates
pub const PACKAGE_PLACEHOLDER: &str = "{package}";

/// String-producing view of the host project
pub trait ProjectCommands {
    /// Application (package) name
    fn app_name(&self) -> &str;

    /// Directory holding the synthesized cloud assembly
    fn cdk_out(&self) -> &str;

    /// Package namespace used for versioned assemblies (e.g. `@assembly`)
    fn package_namespace(&self) -> &str;

    /// Commands installing project dependencies in CI
    fn install_commands(&self) -> Vec<String>;

    /// Commands synthesizing the cloud assembly
    fn synth_commands(&self) -> Vec<String>;

    /// Commands computing the diff of a stage
    fn diff_commands(&self, stage: &str) -> Vec<String>;

    /// Commands deploying a stage
    fn deploy_commands(&self, stage: &str) -> Vec<String>;

    /// Commands publishing assets, optionally scoped to one stage
    fn asset_upload_commands(&self, stage: Option<&str>) -> Vec<String>;

    /// Commands publishing the versioned cloud assembly package
    fn assembly_upload_commands(&self) -> Vec<String>;

    /// Commands installing a package reference (`name@version`)
    fn install_package_commands(&self, package: &str) -> Vec<String>;
}

/// Template-driven host project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Application name
    pub name: String,

    /// Cloud assembly output directory
    pub cdk_out: String,

    /// Package namespace for versioned assemblies
    pub package_namespace: String,

    /// Install command
    pub install: String,

    /// Synth command
    pub synth: String,

    /// Diff command template (`{stage}`)
    pub diff: String,

    /// Deploy command template (`{stage}`)
    pub deploy: String,

    /// Global asset publishing command
    pub publish_assets: String,

    /// Stage-scoped asset publishing command template (`{stage}`)
    pub publish_assets_stage: String,

    /// Commands bumping and pushing the versioned assembly
    pub publish_assembly: Vec<String>,

    /// Package install command template (`{package}`)
    pub install_package: String,

    /// Commands run before installing dependencies
    pub pre_install_commands: Vec<String>,

    /// Commands run before synth
    pub pre_synth_commands: Vec<String>,

    /// Commands run after synth
    pub post_synth_commands: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            cdk_out: "cdk.out".to_string(),
            package_namespace: "@assembly".to_string(),
            install: "npx projen install:ci".to_string(),
            synth: "npx projen build".to_string(),
            diff: "npx projen diff:{stage}".to_string(),
            deploy: "npx projen deploy:{stage}".to_string(),
            publish_assets: "npx projen publish:assets".to_string(),
            publish_assets_stage: "npx projen publish:assets:{stage}".to_string(),
            publish_assembly: vec![
                "npx projen bump".to_string(),
                "npx projen release:push-assembly".to_string(),
            ],
            install_package: "yarn add {package}".to_string(),
            pre_install_commands: Vec::new(),
            pre_synth_commands: Vec::new(),
            post_synth_commands: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Project with default command templates
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_package_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.package_namespace = namespace.into();
        self
    }

    pub fn with_cdk_out(mut self, cdk_out: impl Into<String>) -> Self {
        self.cdk_out = cdk_out.into();
        self
    }

    pub fn with_pre_install_command(mut self, command: impl Into<String>) -> Self {
        self.pre_install_commands.push(command.into());
        self
    }
}

impl ProjectCommands for ProjectConfig {
    fn app_name(&self) -> &str {
        &self.name
    }

    fn cdk_out(&self) -> &str {
        &self.cdk_out
    }

    fn package_namespace(&self) -> &str {
        &self.package_namespace
    }

    fn install_commands(&self) -> Vec<String> {
        let mut commands = self.pre_install_commands.clone();
        commands.push(self.install.clone());
        commands
    }

    fn synth_commands(&self) -> Vec<String> {
        let mut commands = self.pre_synth_commands.clone();
        commands.push(self.synth.clone());
        commands.extend(self.post_synth_commands.iter().cloned());
        commands
    }

    fn diff_commands(&self, stage: &str) -> Vec<String> {
        vec![self.diff.replace(STAGE_PLACEHOLDER, stage)]
    }

    fn deploy_commands(&self, stage: &str) -> Vec<String> {
        vec![self.deploy.replace(STAGE_PLACEHOLDER, stage)]
    }

    fn asset_upload_commands(&self, stage: Option<&str>) -> Vec<String> {
        match stage {
            Some(stage) => vec![self.publish_assets_stage.replace(STAGE_PLACEHOLDER, stage)],
            None => vec![self.publish_assets.clone()],
        }
    }

    fn assembly_upload_commands(&self) -> Vec<String> {
        self.publish_assembly.clone()
    }

    fn install_package_commands(&self, package: &str) -> Vec<String> {
        vec![self.install_package.replace(PACKAGE_PLACEHOLDER, package)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates() {
        let project = ProjectConfig::new("testapp");
        assert_eq!(project.install_commands(), vec!["npx projen install:ci"]);
        assert_eq!(project.synth_commands(), vec!["npx projen build"]);
        assert_eq!(project.deploy_commands("dev"), vec!["npx projen deploy:dev"]);
        assert_eq!(project.diff_commands("prod"), vec!["npx projen diff:prod"]);
    }

    #[test]
    fn test_asset_upload_scoping() {
        let project = ProjectConfig::default();
        assert_eq!(project.asset_upload_commands(None), vec!["npx projen publish:assets"]);
        assert_eq!(
            project.asset_upload_commands(Some("dev")),
            vec!["npx projen publish:assets:dev"]
        );
    }

    #[test]
    fn test_pre_install_commands_come_first() {
        let project = ProjectConfig::default().with_pre_install_command("echo hello");
        assert_eq!(
            project.install_commands(),
            vec!["echo hello", "npx projen install:ci"]
        );
    }

    #[test]
    fn test_install_package_template() {
        let project = ProjectConfig::default();
        assert_eq!(
            project.install_package_commands("@assembly/app@1.2.3"),
            vec!["yarn add @assembly/app@1.2.3"]
        );
    }
}
