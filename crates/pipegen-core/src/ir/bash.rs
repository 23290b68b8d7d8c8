//! Flat shell rendering
//!
//! No job graph: sections run strictly in order.

use serde::Serialize;

/// A titled group of commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BashSection {
    pub title: String,
    pub commands: Vec<String>,
}

/// A sequential shell script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BashScript {
    pub sections: Vec<BashSection>,
}

impl BashScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_section(&mut self, title: impl Into<String>, commands: Vec<String>) {
        self.sections.push(BashSection {
            title: title.into(),
            commands,
        });
    }

    /// All commands in execution order
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|section| section.commands.iter().map(String::as_str))
    }

    pub fn file_path(&self) -> &'static str {
        "pipeline.sh"
    }

    /// Render as script text
    pub fn to_script(&self) -> String {
        let mut script = String::from("#!/usr/bin/env bash\nset -euo pipefail\n");
        for section in &self.sections {
            script.push_str(&format!("\n# {}\n", section.title));
            for command in &section.commands {
                script.push_str(command);
                script.push('\n');
            }
        }
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_script_layout() {
        let mut script = BashScript::new();
        script.push_section("synth", vec!["npx projen build".to_string()]);
        script.push_section("deploy dev", vec!["npx projen deploy:dev".to_string()]);

        assert_eq!(
            script.to_script(),
            "#!/usr/bin/env bash\nset -euo pipefail\n\n# synth\nnpx projen build\n\n# deploy dev\nnpx projen deploy:dev\n"
        );
    }
}
