//! Tool descriptors: the command model of one compose implementation.
//!
//! A descriptor is pure data. It says which binary to run, which options every
//! invocation carries, how to spell `up` and `down`, and which command lists
//! running resources afterwards. Tools differ only in this data; the lifecycle
//! driver runs all of them through the same code path.
//!
//! ```yaml
//! name: docker-composeV2
//! command: docker
//! ps_command: docker ps
//! global_opts:
//!   - name: compose
//! up:
//!   name: up
//!   opts:
//!     - name: -d
//! down:
//!   name: down
//! ```

use crate::errors::HarnessError;
use serde::Deserialize;
use std::path::Path;

/// One command-line option, optionally followed by a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Opt {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Opt {
    /// Append `name` and, if non-empty, `value`.
    fn push_onto(&self, args: &mut Vec<String>) {
        args.push(self.name.clone());
        if let Some(value) = self.value.as_ref().filter(|v| !v.is_empty()) {
            args.push(value.clone());
        }
    }
}

/// A sub-command (`up`, `down`) and its own options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Verb {
    pub name: String,
    #[serde(default)]
    pub opts: Vec<Opt>,
}

/// How to drive one tool under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool label, matched against scenario skip lists.
    pub name: String,
    /// Executable to invoke.
    pub command: String,
    /// Whitespace-separated command whose output lists running resources,
    /// one per line after a header line.
    #[serde(rename = "ps_command")]
    pub status_command: String,
    #[serde(default)]
    pub global_opts: Vec<Opt>,
    #[serde(default)]
    pub up: Verb,
    #[serde(default)]
    pub down: Verb,
}

impl ToolDescriptor {
    /// Read and validate a descriptor file.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let contents = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &contents)
    }

    /// Parse and validate descriptor text. `path` is only used in errors.
    pub fn from_yaml(path: &Path, contents: &str) -> Result<Self, HarnessError> {
        let descriptor: ToolDescriptor =
            serde_yaml::from_str(contents).map_err(|e| HarnessError::MalformedDescriptor {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let required = [
            ("name", &descriptor.name),
            ("command", &descriptor.command),
            ("ps_command", &descriptor.status_command),
            ("up.name", &descriptor.up.name),
            ("down.name", &descriptor.down.name),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(HarnessError::MalformedDescriptor {
                path: path.to_path_buf(),
                reason: format!("`{}` must not be empty", field),
            });
        }

        if descriptor.status_words().is_none() {
            return Err(HarnessError::MalformedDescriptor {
                path: path.to_path_buf(),
                reason: "`ps_command` has unbalanced quotes".to_string(),
            });
        }

        Ok(descriptor)
    }

    /// Flatten global options, the verb name, then the verb's options.
    ///
    /// Order is exactly as declared; tool CLIs are order-sensitive.
    pub fn compose_args(&self, verb: &Verb) -> Vec<String> {
        let mut args = Vec::new();
        for opt in &self.global_opts {
            opt.push_onto(&mut args);
        }
        args.push(verb.name.clone());
        for opt in &verb.opts {
            opt.push_onto(&mut args);
        }
        args
    }

    pub fn up_args(&self) -> Vec<String> {
        self.compose_args(&self.up)
    }

    pub fn down_args(&self) -> Vec<String> {
        self.compose_args(&self.down)
    }

    /// Split the status command into program and arguments.
    ///
    /// Quoting follows POSIX shell rules, so `--format "table {{.Names}}"`
    /// stays one argument. No shell is involved in running it.
    pub fn status_invocation(&self) -> (String, Vec<String>) {
        let mut parts = self.status_words().unwrap_or_default().into_iter();
        let program = parts.next().unwrap_or_default();
        (program, parts.collect())
    }

    fn status_words(&self) -> Option<Vec<String>> {
        shlex::split(&self.status_command).filter(|words| !words.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPOSE_V2: &str = r#"
name: docker-composeV2
command: docker
ps_command: docker ps --filter label=com.docker.compose.project
global_opts:
  - name: compose
  - name: --project-name
    value: compliance
up:
  name: up
  opts:
    - name: -d
    - name: --wait
down:
  name: down
  opts:
    - name: --timeout
      value: "5"
"#;

    fn parse(contents: &str) -> Result<ToolDescriptor, HarnessError> {
        ToolDescriptor::from_yaml(Path::new("test.yml"), contents)
    }

    #[test]
    fn test_compose_args_order() {
        let descriptor = parse(COMPOSE_V2).unwrap();

        assert_eq!(
            descriptor.up_args(),
            vec!["compose", "--project-name", "compliance", "up", "-d", "--wait"]
        );
        assert_eq!(
            descriptor.down_args(),
            vec!["compose", "--project-name", "compliance", "down", "--timeout", "5"]
        );
    }

    #[test]
    fn test_empty_value_emits_flag_only() {
        let descriptor = parse(
            r#"
name: t
command: tool
ps_command: tool ps
up:
  name: up
  opts:
    - name: --detach
      value: ""
down:
  name: down
"#,
        )
        .unwrap();

        assert_eq!(descriptor.up_args(), vec!["up", "--detach"]);
        assert_eq!(descriptor.down_args(), vec!["down"]);
    }

    #[test]
    fn test_status_invocation_splits_on_whitespace() {
        let descriptor = parse(COMPOSE_V2).unwrap();

        let (program, args) = descriptor.status_invocation();
        assert_eq!(program, "docker");
        assert_eq!(
            args,
            vec!["ps", "--filter", "label=com.docker.compose.project"]
        );
    }

    #[test]
    fn test_status_invocation_keeps_quoted_arguments() {
        let descriptor = parse(
            r#"
name: t
command: docker
ps_command: docker ps --format "table {{.Names}}"
up:
  name: up
down:
  name: down
"#,
        )
        .unwrap();

        let (program, args) = descriptor.status_invocation();
        assert_eq!(program, "docker");
        assert_eq!(args, vec!["ps", "--format", "table {{.Names}}"]);
    }

    #[test]
    fn test_unbalanced_status_quotes_are_rejected() {
        let err = parse(
            r#"
name: t
command: docker
ps_command: docker ps --format "table
up:
  name: up
down:
  name: down
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("unbalanced quotes"), "got: {}", err);
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = parse("name: [unterminated").unwrap_err();
        assert!(matches!(err, HarnessError::MalformedDescriptor { .. }));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let err = parse(
            r#"
name: t
command: tool
up:
  name: up
down:
  name: down
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("ps_command"), "got: {}", err);
    }

    #[test]
    fn test_missing_verb_is_rejected() {
        let err = parse(
            r#"
name: t
command: tool
ps_command: tool ps
up:
  name: up
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("down.name"), "got: {}", err);
    }
}
