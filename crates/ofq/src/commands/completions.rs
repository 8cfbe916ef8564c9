//! Shell completions command implementation.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};

use crate::cli::{Cli, Shell};

/// Generate shell completions for the given shell and write to stdout.
pub fn execute(shell: &Shell) {
    let mut cmd = Cli::command();
    generate(to_clap_shell(shell), &mut cmd, "ofq", &mut io::stdout());
}

fn to_clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::Powershell => ClapShell::PowerShell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_mapping() {
        assert!(matches!(to_clap_shell(&Shell::Bash), ClapShell::Bash));
        assert!(matches!(to_clap_shell(&Shell::Zsh), ClapShell::Zsh));
        assert!(matches!(to_clap_shell(&Shell::Fish), ClapShell::Fish));
        assert!(matches!(
            to_clap_shell(&Shell::Powershell),
            ClapShell::PowerShell
        ));
    }

    #[test]
    fn test_generated_script_names_binary() {
        let mut buf = Vec::new();
        generate(ClapShell::Bash, &mut Cli::command(), "ofq", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("ofq"));
        assert!(script.contains("compile"));
    }
}
