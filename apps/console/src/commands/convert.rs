//! # Unit Conversion
//!
//! Runs the recipe-costing conversion on its own, for checking a recipe
//! line by hand. Units with no conversion path give the value back
//! unchanged, exactly as costing does.

use clap::Args;
use serde::Serialize;

use sapore_core::units::{conversion_factor, convert_str, Unit};

use super::parse_number;
use crate::error::CommandResult;
use crate::output::{decimal, CommandOutput};

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    #[arg(value_parser = parse_number)]
    pub value: f64,

    /// Source unit (mg, g, kg, ml, cl, L, un)
    pub from: String,

    /// Target unit
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Conversion<'a> {
    value: f64,
    from: &'a str,
    to: &'a str,
    result: f64,
    converted: bool,
}

pub fn run(args: &ConvertArgs) -> CommandResult<CommandOutput> {
    let result = convert_str(args.value, &args.from, &args.to);
    let converted = matches!(
        (args.from.parse::<Unit>(), args.to.parse::<Unit>()),
        (Ok(from), Ok(to)) if conversion_factor(from, to).is_some()
    ) || args.from.trim() == args.to.trim();

    let mut text = format!(
        "{} {} = {} {}",
        decimal(args.value),
        args.from.trim(),
        decimal(result),
        args.to.trim()
    );
    if !converted {
        text.push_str(&format!(
            "\nSem conversão entre {} e {}: valor mantido.",
            args.from.trim(),
            args.to.trim()
        ));
    }

    CommandOutput::new(
        text,
        &Conversion {
            value: args.value,
            from: args.from.trim(),
            to: args.to.trim(),
            result,
            converted,
        },
    )
}
