use std::io::{self, Write};

/// One sequential console prompt; the answer is trimmed.
pub fn ask(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt where a blank answer means "none".
pub fn ask_optional(label: &str) -> anyhow::Result<Option<String>> {
    let answer = ask(label)?;
    Ok(if answer.is_empty() { None } else { Some(answer) })
}

/// Yes/no prompt; blank takes the default.
pub fn ask_yes_no(label: &str, default: bool) -> anyhow::Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = ask(&format!("{label} [{hint}]"))?;
    Ok(match answer.to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}
