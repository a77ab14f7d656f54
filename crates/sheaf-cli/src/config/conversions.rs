use super::loading::CliOverrides;
use super::types::*;
use super::SheafConfig;
use crate::cli::ProjectArgs;
use sheaf_bundler::{
    BuildMode, BundleNames, Manifest, OptimizerModule, OptimizerModules, ProjectLayout,
    VendorModuleEntry, WorkerCommand,
};

impl From<Mode> for BuildMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Development => BuildMode::Development,
            Mode::Production => BuildMode::Production,
        }
    }
}

impl From<&ProjectArgs> for CliOverrides {
    fn from(args: &ProjectArgs) -> Self {
        let mode = if args.dev {
            Some(Mode::Development)
        } else {
            args.mode
        };

        Self {
            root: args.root.clone(),
            build_dir: args.build_dir.clone(),
            mode,
            // Only an explicit --no-fork overrides the configured value
            fork: args.no_fork.then_some(false),
            max_workers: args.max_workers,
        }
    }
}

impl From<OptimizerModule> for OptimizerModuleConfig {
    fn from(module: OptimizerModule) -> Self {
        Self {
            base_url: module.base_url,
            name: module.name,
        }
    }
}

impl From<&OptimizerModuleConfig> for OptimizerModule {
    fn from(module: &OptimizerModuleConfig) -> Self {
        OptimizerModule::new(module.base_url.clone(), module.name.clone())
    }
}

impl From<OptimizerModules> for OptimizerModulesConfig {
    fn from(modules: OptimizerModules) -> Self {
        let convert = |list: Vec<OptimizerModule>| list.into_iter().map(Into::into).collect();
        Self {
            shared: convert(modules.shared),
            client: convert(modules.client),
            admin: convert(modules.admin),
        }
    }
}

impl From<&OptimizerModulesConfig> for OptimizerModules {
    fn from(modules: &OptimizerModulesConfig) -> Self {
        let convert = |list: &[OptimizerModuleConfig]| list.iter().map(Into::into).collect();
        Self {
            shared: convert(&modules.shared),
            client: convert(&modules.client),
            admin: convert(&modules.admin),
        }
    }
}

impl From<BundleNames> for BundleNamesConfig {
    fn from(names: BundleNames) -> Self {
        Self {
            client: names.client,
            admin: names.admin,
        }
    }
}

impl From<&BundleNamesConfig> for BundleNames {
    fn from(names: &BundleNamesConfig) -> Self {
        Self {
            client: names.client.clone(),
            admin: names.admin.clone(),
        }
    }
}

impl From<&ScriptsConfig> for Manifest {
    fn from(scripts: &ScriptsConfig) -> Self {
        Manifest::new(
            scripts.base.clone(),
            scripts.client.clone(),
            scripts.admin.clone(),
            scripts
                .modules
                .iter()
                .map(|m| VendorModuleEntry::new(m.registered_name.clone(), m.source_path.clone()))
                .collect(),
        )
    }
}

impl From<&WorkerCommandConfig> for WorkerCommand {
    fn from(command: &WorkerCommandConfig) -> Self {
        WorkerCommand::new(command.program.clone(), command.args.iter().cloned())
    }
}

impl SheafConfig {
    pub fn build_mode(&self) -> BuildMode {
        self.mode.into()
    }

    /// Project layout for `root` and `buildDir`.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.root).with_build_dir(&self.build_dir)
    }

    /// The configured manifest, or the built-in one.
    pub fn manifest(&self) -> Manifest {
        self.scripts
            .as_ref()
            .map(Manifest::from)
            .unwrap_or_else(Manifest::builtin)
    }
}
