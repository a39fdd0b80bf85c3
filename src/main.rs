fn main() {
    ansunit::cli::run();
}
