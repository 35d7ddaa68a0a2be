//! Completions command implementation

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};

/// Handle `gpumon completions` command
pub fn handle_completions(args: &CompletionsArgs) {
    write_completions(args, &mut io::stdout());
}

pub fn write_completions(args: &CompletionsArgs, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    #[test]
    fn test_completions_bash_mentions_subcommands() {
        let mut out = Vec::new();
        write_completions(&CompletionsArgs { shell: Shell::Bash }, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("gpumon"));
        assert!(script.contains("clean-logs"));
    }

    #[test]
    fn test_completions_zsh() {
        let mut out = Vec::new();
        write_completions(&CompletionsArgs { shell: Shell::Zsh }, &mut out);
        assert!(!out.is_empty());
    }
}
