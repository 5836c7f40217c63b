/// stderr への env_logger を初期化
///
/// `level` は env_logger のフィルタ書式（"info", "motion_coach=debug" など）。
/// すでに初期化済みなら何もしない。
pub fn init_logger(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);
    builder.format(|buf, record| {
        use std::io::Write;
        let module = record.module_path().unwrap_or(record.target());
        writeln!(buf, "[{:<5}] {}: {}", record.level(), module, record.args())
    });
    let _ = builder.try_init();
}
