fn main() -> anyhow::Result<()> {
    wordcount::init();

    wordcount::cli::run()
}
