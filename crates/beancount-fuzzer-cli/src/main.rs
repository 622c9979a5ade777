fn main() -> anyhow::Result<()> {
    beancount_fuzzer_cli::run(std::env::args())
}
