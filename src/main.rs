fn main() -> anyhow::Result<()> {
    redakt::run()?;
    Ok(())
}
