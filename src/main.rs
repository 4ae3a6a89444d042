use anyhow::Context;
use millstream::{
    init_logging, list_ports, FileSource, GrblSession, JobSnapshot, KeyQueue, MillingSequencer,
    OperatorKey, Presenter, SequencerState, SerialTransport, Settings, UpdateOutcome,
};
use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Status display on stdout: one line per change, overwritten in place.
#[derive(Default)]
struct ConsolePresenter {
    last_line: String,
}

impl Presenter for ConsolePresenter {
    fn show_loading(&mut self, file_name: &str, progress: f32) {
        print!("\rReading {} {:3.0}%", file_name, progress * 100.0);
        let _ = std::io::stdout().flush();
    }

    fn show_status(&mut self, snapshot: &JobSnapshot) {
        let controls = match snapshot.state {
            SequencerState::Ready => "[b]ack [r]un",
            SequencerState::Running => "[s]top [p]ause",
            SequencerState::Paused => "[s]top [r]esume",
        };
        let line = format!(
            "{} {}/{} | {} | {}s | {} | {}",
            snapshot.file_name,
            snapshot.current_line,
            snapshot.total_lines,
            snapshot.machine,
            snapshot.elapsed_seconds,
            snapshot.current_command,
            controls,
        );
        if line != self.last_line {
            print!("\r\x1b[2K{}", line);
            let _ = std::io::stdout().flush();
            self.last_line = line;
        }
    }
}

/// Read operator keys from stdin on a separate thread
///
/// The reader thread crosses into the tick loop only through the channel;
/// all state changes still happen inside the single-threaded update.
fn spawn_key_reader() -> mpsc::Receiver<OperatorKey> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let key = match line.trim().chars().next() {
                Some('b') => Some(OperatorKey::Back),
                Some('s') => Some(OperatorKey::Stop),
                Some('p') => Some(OperatorKey::Pause),
                Some('r') => Some(OperatorKey::Play),
                _ => None,
            };
            if let Some(key) = key {
                if tx.send(key).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

fn print_usage() {
    eprintln!("usage: millstream <program.nc>");
    eprintln!();
    eprintln!("Keys (press then Enter): b=back s=stop p=pause r=run/resume");
    match list_ports() {
        Ok(ports) if !ports.is_empty() => {
            eprintln!();
            eprintln!("Available ports:");
            for port in ports {
                eprintln!("  {} ({})", port.port_name, port.description);
            }
        }
        _ => {}
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let Some(program_path) = std::env::args().nth(1) else {
        print_usage();
        std::process::exit(2);
    };

    let settings = Settings::load_or_default("millstream.json");
    tracing::info!(
        port = %settings.connection.port,
        baud = settings.connection.baud_rate,
        "millstream {}",
        millstream::VERSION
    );

    let transport = SerialTransport::new(
        &settings.connection.port,
        settings.connection.baud_rate,
    )
    .with_timeout_ms(settings.connection.timeout_ms);
    let mut session = GrblSession::new(Box::new(transport));
    session
        .connect()
        .with_context(|| format!("connecting to {}", settings.connection.port))?;

    let source = Box::new(
        FileSource::open(&program_path)
            .with_context(|| format!("opening {}", program_path))?,
    );

    let mut presenter = ConsolePresenter::default();
    let file_name = program_path.clone();
    let mut sequencer = MillingSequencer::load(source, &mut session, &mut |progress| {
        presenter.show_loading(&file_name, progress)
    })
    .context("loading program")?;
    println!();

    let key_rx = spawn_key_reader();
    let mut keys = KeyQueue::new();
    let tick = Duration::from_millis(settings.host.tick_interval_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        while let Ok(key) = key_rx.try_recv() {
            keys.press(key);
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last_tick).as_millis() as u64;
        last_tick = now;

        match sequencer.update(&mut session, &mut keys, delta_ms)? {
            UpdateOutcome::Back => break,
            UpdateOutcome::Continue => {}
        }
        presenter.show_status(&sequencer.snapshot(&session));

        std::thread::sleep(tick);
    }

    println!();
    session.disconnect()?;
    Ok(())
}
