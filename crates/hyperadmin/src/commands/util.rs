//! Shared helpers for command handlers.

use std::io::IsTerminal;

use hyperadmin_core::FormModel;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so `--yes` is
/// required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Apply `--set FIELD=VALUE` assignments to a form.
pub fn apply_assignments(
    form: &mut FormModel,
    assignments: Vec<(String, String)>,
) -> Result<(), CliError> {
    for (name, value) in assignments {
        form.set_value(&name, value)?;
    }
    Ok(())
}

/// Reject a form whose required editable fields are still blank.
pub fn check_required(form: &FormModel) -> Result<(), CliError> {
    match form
        .fields()
        .iter()
        .find(|f| f.editable && f.required && f.value.trim().is_empty())
    {
        Some(field) => Err(CliError::Validation {
            field: field.name.clone(),
            reason: format!("required; pass --set {}=...", field.name),
        }),
        None => Ok(()),
    }
}
