//! The `explain` command: describe a diagnostic kind.

use zeile_diagnostic::DiagnosticId;

/// Severity and message template of the diagnostic named `id`.
pub fn explanation(id: &str) -> Option<String> {
    let id = id.parse::<DiagnosticId>().ok()?;
    Some(format!(
        "{id} ({severity})\n\n    {template}\n",
        severity = id.default_severity(),
        template = id.template(),
    ))
}

pub fn explain_diagnostic(id: &str) {
    let Some(text) = explanation(id) else {
        eprintln!("Unknown diagnostic: {id}");
        eprintln!();
        eprintln!("Diagnostic ids are snake_case names such as `invalid_redeclaration`.");
        eprintln!("Run `zeile explain --list` to see all of them.");
        std::process::exit(1);
    };
    print!("{text}");
}

/// Print every catalog id with its default severity.
pub fn list_diagnostics() {
    for id in DiagnosticId::ALL {
        println!("{:<40} {}", id.as_str(), id.default_severity());
    }
}
