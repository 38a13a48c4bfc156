use clap::Parser;
use conmenu::core::config::{self, CliOverrides};
use conmenu::core::format::AnsiColor;
use conmenu::io::TerminalIo;
use conmenu::{
    ActionError, ActionResult, Console, ConsoleSettings, LoggingLevel, MenuHandle, MenuItem,
    MenuTree, Navigator,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "conmenu", about = "Paged text-mode menu console")]
struct Args {
    /// Console verbosity: disabled, -1, 0, 1, 2 or 3
    #[arg(short, long, allow_hyphen_values = true)]
    logging_level: Option<LoggingLevel>,

    /// Single-line headers
    #[arg(short, long)]
    small_headers: bool,

    /// Skip the splash screen
    #[arg(long)]
    no_splash: bool,

    /// Config file to use instead of ~/.conmenu/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to conmenu.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("conmenu.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .map_err(|e| {
        eprintln!("{e}");
        std::io::Error::other(e)
    })?;

    let cli = CliOverrides {
        logging_level: args.logging_level,
        small_headers: args.small_headers,
        no_splash: args.no_splash,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!("Conmenu starting up with {:?}", resolved);

    let (tree, main_menu) = demo_menus();
    let settings = ConsoleSettings {
        splash_lines: resolved.splash_lines,
        main_menu,
        small_headers: resolved.small_headers,
        logging_level: resolved.logging_level,
        quit_from_any_menu: resolved.quit_from_any_menu,
    };

    let io = TerminalIo::new()?;
    let mut navigator = Navigator::initialize(settings, tree, Box::new(io));
    navigator.run()
}

/// Sample tree showing sub-menus, paging, a shared menu, a mutable menu
/// and leaf actions that prompt, print and fail.
fn demo_menus() -> (MenuTree, MenuHandle) {
    let mut tree = MenuTree::new();
    let main = tree.add_menu("Main Menu", "Demo console");
    let system = tree.add_menu("System", "Board information and self tests");
    let registers = tree.add_menu("Registers", "Peripheral register dump");
    let settings = tree.add_menu("Settings", "Console behaviour");

    let mut renders = 0usize;
    let jobs = tree.add_mutable_menu("Jobs", "Regenerated on every visit", move |items: &mut Vec<MenuItem>| {
        renders += 1;
        let count = renders % 15 + 1;
        *items = (0..count)
            .map(|i| {
                MenuItem::action(
                    format!("job{i}"),
                    format!("spawned on refresh {renders}"),
                    move |console: &mut Console, _args: &[&str]| -> ActionResult {
                        console.print(LoggingLevel::Level0, format_args!("job{i} is idle"));
                        Ok(())
                    },
                )
            })
            .collect();
    });

    tree.add_items(main, [
        MenuItem::sub_menu("System", "Board information and self tests", system),
        MenuItem::sub_menu("Registers", "Peripheral register dump", registers),
        MenuItem::sub_menu("Jobs", "Dynamic job list", jobs),
        MenuItem::sub_menu("Settings", "Console behaviour", settings),
    ]);

    tree.add_items(system, [
        MenuItem::action("Info", "Describe this console", |console: &mut Console, _args: &[&str]| -> ActionResult {
            console.print_sub_header(LoggingLevel::Level0, "About");
            console.print_block(
                LoggingLevel::Level0,
                "Menus are paged ten items at a time. Digits pick an item on the current page, \
                 letters move between pages and menus. Actions run in place and the menu is \
                 shown again when they return.",
            );
            console.prompt_for_any_key_blocking()?;
            Ok(())
        }),
        MenuItem::action("Self test", "Always fails", |console: &mut Console, _args: &[&str]| -> ActionResult {
            for pct in (0..=100).step_by(25) {
                console.print_in_place(LoggingLevel::Level1, format_args!("testing... {pct}%"));
            }
            console.print_new_line(LoggingLevel::Level1);
            Err(ActionError::Failed("loopback not connected".to_string()))
        }),
        MenuItem::sub_menu("Settings", "Same menu as Main > Settings", settings),
    ]);

    tree.add_items(
        registers,
        (0..14u32).map(|n| {
            let address = 0x4000_0000 + n * 4;
            MenuItem::action(
                format!("REG{n:02}"),
                format!("0x{address:08X}"),
                move |console: &mut Console, _args: &[&str]| -> ActionResult {
                    let value = address.rotate_left(n) ^ 0xA5A5_A5A5;
                    console.print_color(LoggingLevel::Level0, AnsiColor::Cyan, &format!("REG{n:02}"));
                    console.print(LoggingLevel::Level0, format_args!(" = 0x{value:08X}"));
                    Ok(())
                },
            )
        }),
    );

    tree.add_items(settings, [
        MenuItem::action("Small headers", "Toggle single-line headers", |console: &mut Console, _args: &[&str]| -> ActionResult {
            let enable = !console.small_headers();
            console.set_small_headers(enable);
            console.print_success(LoggingLevel::Level0, format_args!("Small headers {}", if enable { "on" } else { "off" }));
            Ok(())
        }),
        MenuItem::action("Logging level", "Set console verbosity", |console: &mut Console, _args: &[&str]| -> ActionResult {
            let current = i8::from(console.logging_level()).max(0) as u32;
            let level = console.prompt_for_int("Logging level (0-3)", current)?;
            let level = i8::try_from(level)
                .ok()
                .and_then(|l| LoggingLevel::try_from(l).ok())
                .ok_or_else(|| ActionError::InvalidArgument(format!("{level} is not a logging level")))?;
            console.set_logging_level(level);
            Ok(())
        }),
        MenuItem::action("Hostname", "Prompt for a string", |console: &mut Console, _args: &[&str]| -> ActionResult {
            let name = console.prompt_for_string("Hostname", "conmenu")?;
            console.print_warn(LoggingLevel::Level0, format_args!("Hostname is now '{name}' (not persisted)"));
            Ok(())
        }),
        MenuItem::action("Base address", "Prompt for a hex value", |console: &mut Console, _args: &[&str]| -> ActionResult {
            let base = console.prompt_for_hex_u64("Base address", 0x2000_0000)?;
            console.print(LoggingLevel::Level0, format_args!("Base address 0x{base:016X}"));
            Ok(())
        }),
    ]);

    (tree, main)
}
