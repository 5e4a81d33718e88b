use anyhow::Result;

fn main() -> Result<()> {
    hexpad::cli::run()
}
