fn main() {
    std::process::exit(consumer_pool::app::startup::startup());
}
