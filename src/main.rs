use mazeway::{app::App, config::Config};

const USAGE: &str = "Usage: mazeway [WIDTH HEIGHT] [dfs|bfs|random] [SEED]
Generates mazes and watches the chosen strategy solve them until Esc is pressed.
Logs go to mazeway.log in the working directory.";

/// Builds the runtime configuration from positional arguments, all
/// optional: dimensions first, then the solver algorithm, then a seed.
fn parse_config() -> Result<Config, String> {
    let mut config = Config::default();
    let mut args = std::env::args().skip(1).peekable();

    if let Some(raw) = args.peek() {
        if raw.chars().all(|c| c.is_ascii_digit()) {
            let raw = args.next().expect("peeked");
            config.maze_width = raw.parse().map_err(|_| format!("Invalid width '{raw}'."))?;
            let raw = args
                .next()
                .ok_or("Height is required when width is given.")?;
            config.maze_height = raw
                .parse()
                .map_err(|_| format!("Invalid height '{raw}'."))?;
        }
    }
    if let Some(raw) = args.next() {
        config.algorithm = raw.parse()?;
    }
    if let Some(raw) = args.next() {
        config.seed = Some(raw.parse().map_err(|_| format!("Invalid seed '{raw}'."))?);
    }

    config.validate()?;
    Ok(config)
}

fn main() -> std::io::Result<()> {
    let config = match parse_config() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            return Ok(());
        }
    };

    // The terminal belongs to the renderer, so logs go to a file.
    let file_appender = tracing_appender::rolling::never(".", "mazeway.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!(
        "[main] starting: {}x{} mazes, {}, seed {:?}",
        config.maze_width,
        config.maze_height,
        config.algorithm,
        config.seed
    );

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).run();
    App::restore_terminal(&mut stdout)?;
    result
}
