use anyhow::{bail, Result};
use colored::Colorize;

use vigil::{validate_field, Field, FormMode};

pub fn execute(field: &str, value: &str, mode: FormMode, password: &str) -> Result<()> {
    let field: Field = field.parse()?;

    if !mode.contains(field) {
        println!(
            "{} {} is not part of the {} form and is not checked",
            "•".yellow(),
            field.label(),
            mode
        );
        return Ok(());
    }

    match validate_field(field, value, mode, password) {
        None => {
            println!("{} {} is valid", "✓".green(), field.label().bold());
            Ok(())
        }
        Some(error) => {
            println!("{} {}: {}", "✗".red(), field.label().bold(), error.message);
            bail!("{} failed validation", field)
        }
    }
}
