mod app;
mod calendar;
mod colour;
mod config;
mod help;
mod html;
mod lang;
mod menu;
mod template;
mod theme;
mod year;
use crate::app::App;
use crate::calendar::{CalendarGrid, MonthView, Palette};
use crate::colour::Blend;
use crate::config::{FirstDayOfWeek, SiteConfig};
use crate::lang::{English, Lang, LangFile};
use crate::menu::{MenuEntry, Menus};
use crate::year::YearFile;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Output {
    Preview,
    Html,
    Css,
    Json,
    Menu,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        year_file: PathBuf,
        config: Option<PathBuf>,
        week_starts: Option<FirstDayOfWeek>,
        output: Output,
        logged_in: bool,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut year_file = None;
        let mut config = None;
        let mut week_starts = None;
        let mut output = Output::Preview;
        let mut logged_in = true;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('w') | Arg::Long("week-starts") => {
                    let n = parser.value()?.parse::<u8>()?;
                    match FirstDayOfWeek::try_from(n) {
                        Ok(fd) => week_starts = Some(fd),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value: n.to_string(),
                                error: Box::new(e),
                            })
                        }
                    }
                }
                Arg::Long("html") => output = Output::Html,
                Arg::Long("css") => output = Output::Css,
                Arg::Long("json") => output = Output::Json,
                Arg::Long("menu") => output = Output::Menu,
                Arg::Long("logged-out") => logged_in = false,
                Arg::Value(value) if year_file.is_none() => {
                    year_file = Some(PathBuf::from(value));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        let Some(year_file) = year_file else {
            return Err(lexopt::Error::from("missing year file argument"));
        };
        Ok(Command::Run {
            year_file,
            config,
            week_starts,
            output,
            logged_in,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                year_file,
                config,
                week_starts,
                output,
                logged_in,
            } => {
                let config = match config {
                    Some(path) => SiteConfig::from_file(&path).with_context(|| {
                        format!("failed to load configuration from {}", path.display())
                    })?,
                    None => SiteConfig::default(),
                };
                let lang: Box<dyn Lang> = match config.lang {
                    Some(ref path) => Box::new(LangFile::from_file(path).with_context(|| {
                        format!("failed to load language file {}", path.display())
                    })?),
                    None => Box::new(English),
                };
                let data = YearFile::from_file(&year_file).with_context(|| {
                    format!("failed to load academic year from {}", year_file.display())
                })?;
                let first_day = week_starts.unwrap_or(config.week_starts);
                let grid = CalendarGrid::new(data.year, data.weeks, first_day, &*lang);
                let menus = Menus::for_session(&logged_in);
                let main_menu = menus.main_menu();
                let user_menu = menus.user_menu(&*lang);
                match output {
                    Output::Preview => {
                        let today = OffsetDateTime::now_local()
                            .context("failed to determine local date")?
                            .date();
                        let app = App::new(
                            grid.all_months().collect(),
                            Palette::new(grid.weeks(), Blend),
                            Some(today),
                        )
                        .menus(&main_menu, &user_menu);
                        with_terminal(|terminal| {
                            app.run(terminal)?;
                            Ok(())
                        })
                    }
                    Output::Html => {
                        let css = grid.css().context("failed to generate week range CSS")?;
                        let months = grid.all_months().collect::<Vec<_>>();
                        let page = html::page(&main_menu, &user_menu, &months, &css);
                        write_stdout(page.into_string())
                    }
                    Output::Css => {
                        write_stdout(grid.css().context("failed to generate week range CSS")?)
                    }
                    Output::Json => {
                        let months = grid.all_months().collect::<Vec<MonthView>>();
                        write_json(&months)
                    }
                    Output::Menu => write_json(&MenuReport {
                        user_menu,
                        main_menu,
                    }),
                }
            }
            Command::Help => {
                println!("Usage: acyear [<options>] <YEAR.json>");
                println!();
                println!("Render an academic year's calendar grids, week colours and menus");
                println!();
                println!("Options:");
                println!("  -c FILE, --config FILE");
                println!("                    Read site configuration from the given TOML file");
                println!();
                println!("  -w N, --week-starts N");
                println!("                    Start weeks on day N (1 = Monday ... 7 = Sunday)");
                println!();
                println!("  --html            Print an HTML page with the menus and every month");
                println!("  --css             Print the week range stylesheet");
                println!("  --json            Print every month's grid as JSON");
                println!("  --menu            Print the user & main menus as JSON");
                println!("  --logged-out      Build menus as seen by a visitor who isn't signed in");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                println!();
                println!("Without an output option, the months are shown in an interactive");
                println!("terminal preview.");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
struct MenuReport {
    user_menu: Vec<MenuEntry>,
    main_menu: Vec<MenuEntry>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn write_stdout(s: String) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")?;
    out.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
