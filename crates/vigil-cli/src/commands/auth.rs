use anyhow::{bail, Result};
use colored::Colorize;

use vigil::{Field, FormController, SubmitOutcome};

use super::App;
use crate::output::{print_errors, print_notifications};

/// Values typed into the registration form
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

pub async fn login(app: &App, email: String, password: String) -> Result<()> {
    let mut form = app.login_form();
    form.set_field(Field::Email, email)?;
    form.set_field(Field::Password, password)?;

    println!("{}", "Signing In...".cyan());
    finish(app, &mut form).await
}

pub async fn register(app: &App, registration: Registration) -> Result<()> {
    let mut form = app.register_form();
    form.set_field(Field::FirstName, registration.first_name)?;
    form.set_field(Field::LastName, registration.last_name)?;
    form.set_field(Field::Username, registration.username)?;
    form.set_field(Field::Email, registration.email)?;
    form.set_field(Field::Phone, registration.phone)?;
    form.set_field(Field::Password, registration.password)?;
    form.set_field(Field::ConfirmPassword, registration.confirm_password)?;

    println!("{}", "Creating Account...".cyan());
    finish(app, &mut form).await
}

async fn finish(app: &App, form: &mut FormController) -> Result<()> {
    let outcome = form.submit_and_wait().await;
    print_notifications(&app.inbox);

    match outcome {
        SubmitOutcome::Completed(receipt) => {
            println!("{} {}", "receipt".dimmed(), receipt.id.dimmed());
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            print_errors(&errors);
            bail!("{} form has {} invalid field(s)", form.mode(), errors.len())
        }
        SubmitOutcome::Busy => bail!("a submission is already in progress"),
    }
}
