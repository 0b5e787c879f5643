use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use clap::Parser;

/// Print an Argon2 PHC string for a `credentials.members[].secret` entry.
#[derive(Parser, Debug)]
struct Args {
    password: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(args.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{}", hash);
    Ok(())
}
