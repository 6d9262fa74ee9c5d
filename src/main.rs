fn main() -> anyhow::Result<()> {
    clip_history::cli::run()
}
