fn main() -> anyhow::Result<()> {
    leibniz::run()
}
