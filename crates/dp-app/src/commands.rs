// ABOUTME: Line commands accepted by the previewer on stdin.
// ABOUTME: Parses one input line into a Command.

use anyhow::{anyhow, bail, Context, Result};
use dp_layout::{ContentMode, PanelName, SplitAxis};

pub const HELP: &str = "\
commands:
  show                 draw one frame
  split h|v NAME       split a panel
  close NAME           close a panel
  mode NAME CODE       switch a leaf's content (C L D G S l g B T r s f t)
  drag NAME DELTA      drag a split's gutter
  describe             print the layout description
  dump                 print the panel tree as JSON
  run COMMAND...       send a command to the console
  help                 show this text
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Split(SplitAxis, PanelName),
    Close(PanelName),
    Mode(PanelName, ContentMode),
    Drag(PanelName, i32),
    Describe,
    Dump,
    Run(String),
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let mut arg = |what: &str| words.next().ok_or_else(|| anyhow!("{verb}: missing {what}"));

        let command = match verb {
            "show" => Command::Show,
            "split" => {
                let axis = match arg("axis")? {
                    "h" => SplitAxis::Horizontal,
                    "v" => SplitAxis::Vertical,
                    other => bail!("split: axis must be h or v, got {other:?}"),
                };
                Command::Split(axis, panel_name(arg("panel")?)?)
            }
            "close" => Command::Close(panel_name(arg("panel")?)?),
            "mode" => {
                let name = panel_name(arg("panel")?)?;
                let code = arg("mode code")?;
                let mode = match code.as_bytes() {
                    [byte] => ContentMode::from_code(*byte),
                    _ => None,
                }
                .ok_or_else(|| anyhow!("mode: unknown content code {code:?}"))?;
                Command::Mode(name, mode)
            }
            "drag" => {
                let name = panel_name(arg("panel")?)?;
                let delta = arg("delta")?;
                let delta = delta
                    .parse()
                    .with_context(|| format!("drag: bad delta {delta:?}"))?;
                Command::Drag(name, delta)
            }
            "describe" => Command::Describe,
            "dump" => Command::Dump,
            "run" => {
                let rest = line.trim_start().strip_prefix("run").unwrap_or_default();
                Command::Run(rest.trim().to_string())
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command {other:?}, try help"),
        };
        Ok(Some(command))
    }
}

fn panel_name(word: &str) -> Result<PanelName> {
    word.parse()
        .map_err(|_| anyhow!("not a panel name: {word:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_panel_commands() {
        assert_eq!(
            Command::parse("split v 0000001f").unwrap(),
            Some(Command::Split(SplitAxis::Vertical, "1f".parse().unwrap()))
        );
        assert_eq!(
            Command::parse("mode 2 r").unwrap(),
            Some(Command::Mode("2".parse().unwrap(), ContentMode::Registers))
        );
        assert_eq!(
            Command::parse("drag a -40").unwrap(),
            Some(Command::Drag("a".parse().unwrap(), -40))
        );
    }

    #[test]
    fn run_keeps_the_whole_command() {
        assert_eq!(
            Command::parse("run  break main.go:12 ").unwrap(),
            Some(Command::Run("break main.go:12".to_string()))
        );
        assert_eq!(Command::parse("run").unwrap(), Some(Command::Run(String::new())));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("split x 1").is_err());
        assert!(Command::parse("close").is_err());
        assert!(Command::parse("close zz").is_err());
        assert!(Command::parse("mode 1 Q").is_err());
        assert!(Command::parse("mode 1 CC").is_err());
        assert!(Command::parse("drag 1 far").is_err());
        assert!(Command::parse("resize 1").is_err());
    }
}
