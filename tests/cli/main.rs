mod helpers;
mod library_cli;
