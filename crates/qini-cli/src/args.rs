use anyhow::{anyhow, Context, Result};
use std::str::FromStr;

/// Flags that stand alone and never take a value.
const SWITCHES: &[&str] = &["--include-final-bin"];

/// Flag-style arguments following the subcommand, e.g. `--bins 20 --json out.json`.
pub struct Args {
    args: Vec<String>,
}

impl Args {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Value following `flag`, if the flag is present.
    pub fn value(&self, flag: &str) -> Result<Option<&str>> {
        match self.args.iter().position(|a| a == flag) {
            None => Ok(None),
            Some(i) => self
                .args
                .get(i + 1)
                .filter(|v| !v.starts_with("--"))
                .map(|v| Some(v.as_str()))
                .ok_or_else(|| anyhow!("{} requires a value", flag)),
        }
    }

    pub fn required(&self, flag: &str) -> Result<&str> {
        self.value(flag)?
            .ok_or_else(|| anyhow!("missing required argument {}", flag))
    }

    pub fn parsed<T>(&self, flag: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.value(flag)?
            .map(|v| v.parse::<T>().with_context(|| format!("invalid value '{}' for {}", v, flag)))
            .transpose()
    }

    /// Arguments that are neither flags nor flag values. Any flag other
    /// than a known switch consumes the argument after it.
    pub fn positional(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut iter = self.args.iter().map(String::as_str);
        while let Some(arg) = iter.next() {
            if arg.starts_with("--") {
                if !SWITCHES.contains(&arg) {
                    iter.next();
                }
            } else {
                out.push(arg);
            }
        }
        out
    }
}
