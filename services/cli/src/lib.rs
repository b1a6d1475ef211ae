mod cli;
mod commands;
mod render;

use smash_rank::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
