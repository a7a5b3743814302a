//! Package manager command conversion.

use anyhow::Result;

use folio_mdx::{convert_command, PackageManager};

/// Run the pm command.
pub fn run(command: &str, manager: Option<&str>) -> Result<()> {
    for line in conversions(command, manager)? {
        println!("{}", line);
    }
    Ok(())
}

fn conversions(command: &str, manager: Option<&str>) -> Result<Vec<String>> {
    match manager {
        Some(name) => {
            let manager: PackageManager = name.parse()?;
            Ok(vec![convert_command(command, manager)])
        }
        None => Ok(PackageManager::ALL
            .iter()
            .map(|&manager| format!("{:<5} {}", manager.name(), convert_command(command, manager)))
            .collect()),
    }
}
