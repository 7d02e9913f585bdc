use anyhow::Result;
use colored::Colorize;

use vigil::{Field, SubmitOutcome};

use super::comments::{post, print_board};
use super::App;
use crate::output::{print_errors, print_notifications};

pub async fn execute(app: &App) -> Result<()> {
    section("Login with a malformed email");
    let mut login = app.login_form();
    login.set_field(Field::Email, "jane@example")?;
    login.set_field(Field::Password, "anything")?;
    report(app, login.submit_and_wait().await);

    section("Fixing the email clears only its error");
    login.set_field(Field::Email, "jane@example.com")?;
    println!("  remaining errors: {}", login.errors().len());
    report(app, login.submit_and_wait().await);

    section("Registration with a weak password and a stale confirmation");
    let mut register = app.register_form();
    register.set_field(Field::FirstName, "Jane")?;
    register.set_field(Field::LastName, "Doe")?;
    register.set_field(Field::Username, "jane_doe")?;
    register.set_field(Field::Email, "jane@example.com")?;
    register.set_field(Field::Password, "abcdefgh")?;
    register.set_field(Field::ConfirmPassword, "abcdefgh")?;
    report(app, register.submit_and_wait().await);

    section("Changing the password after confirming it");
    register.set_field(Field::Password, "Abcdef1!")?;
    report(app, register.submit_and_wait().await);

    section("Confirming the new password");
    register.set_field(Field::ConfirmPassword, "Abcdef1!")?;
    report(app, register.submit_and_wait().await);

    section("Comment board");
    let mut board = app.comment_board();
    post(app, &mut board, "short").await;
    post(app, &mut board, "The testing center was quick and friendly.").await;
    if let Some(newest) = board.comments().first().map(|comment| comment.id.clone()) {
        board.like(&newest);
        board.like(&newest);
    }
    board.like("no-such-comment");
    print_board(&board);

    Ok(())
}

fn section(title: &str) {
    println!();
    println!("{} {}", "==>".blue().bold(), title.bold());
}

fn report(app: &App, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Completed(_) => {}
        SubmitOutcome::Rejected(errors) => print_errors(&errors),
        SubmitOutcome::Busy => println!("{}", "busy".yellow()),
    }
    print_notifications(&app.inbox);
}
