//! Output formatting utilities for CLI operations.
//!
//! Every writer emits one record per line so results can be piped into other
//! tools.

use std::collections::HashMap;
use std::io::{self, Write};

use installation_broker::{BrokerError, InstallationSet, PermissionDescriptor, ScopedToken};

/// Writes each installation id on its own line, in upstream order.
pub fn write_installations<W: Write>(
    writer: &mut W,
    installations: &InstallationSet,
) -> Result<(), BrokerError> {
    for id in installations.ids() {
        writeln!(writer, "{id}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes each value on its own line.
pub fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> Result<(), BrokerError> {
    for line in lines {
        writeln!(writer, "{line}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes permission descriptors sorted by repository name.
pub fn write_permissions<W: Write>(
    writer: &mut W,
    descriptors: &HashMap<String, PermissionDescriptor>,
) -> Result<(), BrokerError> {
    let mut sorted: Vec<&PermissionDescriptor> = descriptors.values().collect();
    sorted.sort_by(|left, right| left.repo_full_name.cmp(&right.repo_full_name));

    for descriptor in sorted {
        writeln!(
            writer,
            "{name} admin={admin} push={push} pull={pull}",
            name = descriptor.repo_full_name,
            admin = descriptor.admin,
            push = descriptor.push,
            pull = descriptor.pull
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the raw token value.
///
/// This is the only place the broker reveals a token.
pub fn write_token<W: Write>(writer: &mut W, token: &ScopedToken) -> Result<(), BrokerError> {
    writeln!(writer, "{}", token.expose()).map_err(|e| io_error(&e))
}

fn io_error(error: &io::Error) -> BrokerError {
    BrokerError::Io {
        message: error.to_string(),
    }
}
