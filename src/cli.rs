use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use crate::smtp::Transmitter;
use crate::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

const ENV_HELP: &str = "\
Required environment variables:
  EMAIL_FROM          Sender email address (e.g. your_email@gmail.com)
  EMAIL_FROM_NAME     Sender display name (optional, defaults to EMAIL_FROM)
  EMAIL_PASSWORD      Email password or app-specific password
  EMAIL_TO            Recipient email address
  EMAIL_SMTP_HOST     SMTP server hostname (e.g. smtp.gmail.com)
  EMAIL_SMTP_PORT     SMTP server port (e.g. 465)

The connection is encrypted from the first byte (SMTPS), so use the
server's SSL port.

Examples:
  export EMAIL_FROM=\"your_email@gmail.com\"
  export EMAIL_PASSWORD=\"your_app_password\"
  export EMAIL_TO=\"recipient@example.com\"
  export EMAIL_SMTP_HOST=\"smtp.gmail.com\"
  export EMAIL_SMTP_PORT=\"465\"

  mailsender -s \"Test Subject\" -c \"This is a test email\"

Common SMTP servers:
  Gmail:      smtp.gmail.com:465
  QQ Mail:    smtp.qq.com:465
  163 Mail:   smtp.163.com:465";

pub(crate) fn main() {
    let cli = Command::new("mailsender")
        .about(format!(
            "{}\n{}",
            crate_description!(),
            "Credentials and server details are managed using environment variables.",
        ))
        .after_help(ENV_HELP)
        .arg(
            Arg::new("subject")
                .short('s')
                .value_name("SUBJECT")
                .help("Email subject"),
        )
        .arg(
            Arg::new("content")
                .short('c')
                .value_name("CONTENT")
                .help("Email content/body"),
        )
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration without sending"),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"));

    let args = cli.get_matches();

    setup_logger();

    let subject = args
        .get_one::<String>("subject")
        .cloned()
        .unwrap_or_default();
    let content = args
        .get_one::<String>("content")
        .cloned()
        .unwrap_or_default();

    if subject.is_empty() {
        println!("Error: Email subject parameter -s is required");
        println!("Use -h flag for help");
        exit(1);
    }
    if content.is_empty() {
        println!("Error: Email content parameter -c is required");
        println!("Use -h flag for help");
        exit(1);
    }

    let config = match Config::populate_from_env(subject, content) {
        Ok(config) => config,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    if let Err(err) = config.validate() {
        tracing::error!("Configuration validation failed: {err}");
        exit(2);
    }

    if args.get_flag("check") {
        tracing::info!(
            host = config.smtp_host.as_str(),
            port = config.smtp_port,
            "Configuration is valid."
        );
        exit(0);
    }

    if let Err(err) = Transmitter::from(config).transmit() {
        tracing::error!("{err}");
        exit(2);
    }
}
