fn main() -> std::process::ExitCode {
    labchat_lib::run()
}
