use slog::{o, Drain, Logger};

pub fn make_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).chan_size(8192).build();
    Logger::root(drain.fuse(), o!())
}

pub(crate) fn sleep_secs(secs: u64) {
    let sleep_duration = std::time::Duration::from_secs(secs);
    std::thread::sleep(sleep_duration);
}
