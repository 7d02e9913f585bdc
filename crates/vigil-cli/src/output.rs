use colored::Colorize;

use vigil::{Comment, MemorySink, Severity, ValidationErrors};

pub fn print_errors(errors: &ValidationErrors) {
    for (field, error) in errors.iter() {
        println!("  {} {}: {}", "✗".red(), field.label().bold(), error.message);
    }
}

/// Print and forget every notification received so far
pub fn print_notifications(inbox: &MemorySink) {
    for notification in inbox.drain() {
        let title = match notification.severity {
            Severity::Default => notification.title.green().bold(),
            Severity::Destructive => notification.title.red().bold(),
        };
        println!("{} {}", title, notification.message);
    }
}

pub fn print_comment(comment: &Comment) {
    let badge = if comment.verified {
        format!(" {}", "[Verified]".blue())
    } else {
        String::new()
    };

    println!(
        "[{}] {}{} · {} · {} likes · id {}",
        comment.initials().cyan(),
        comment.author.bold(),
        badge,
        comment.timestamp.dimmed(),
        comment.likes,
        comment.id.dimmed(),
    );
    println!("    {}", comment.content);
}
