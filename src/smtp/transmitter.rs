use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::commands::{Data, Mail, Rcpt};
use lettre::transport::smtp::extension::ClientId;
use lettre::Address;
use secrecy::ExposeSecret;
use snafu::ResultExt;

use crate::common::{
    AddressSnafu, AuthenticationSnafu, ConnectSnafu, DataSnafu, QuitSnafu, RecipientSnafu, Result,
    SenderSnafu, TlsSnafu, WriteSnafu,
};
use crate::Config;

/// One authenticated SMTP submission, one method per protocol step so a
/// failure names the step that produced it.
pub(crate) trait Session {
    fn authenticate(&mut self, username: &str, password: &str) -> Result<()>;
    fn declare_sender(&mut self, sender: &Address) -> Result<()>;
    fn declare_recipient(&mut self, recipient: &Address) -> Result<()>;
    fn write_message(&mut self, message: &[u8]) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

impl Session for SmtpConnection {
    fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(username.to_owned(), password.to_owned());
        self.auth(&[Mechanism::Plain], &credentials)
            .context(AuthenticationSnafu)?;
        Ok(())
    }

    fn declare_sender(&mut self, sender: &Address) -> Result<()> {
        self.command(Mail::new(Some(sender.clone()), vec![]))
            .context(SenderSnafu)?;
        Ok(())
    }

    fn declare_recipient(&mut self, recipient: &Address) -> Result<()> {
        self.command(Rcpt::new(recipient.clone(), vec![]))
            .context(RecipientSnafu)?;
        Ok(())
    }

    fn write_message(&mut self, message: &[u8]) -> Result<()> {
        self.command(Data).context(DataSnafu)?;
        self.message(message).context(WriteSnafu)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.quit().context(QuitSnafu)?;
        Ok(())
    }
}

pub struct Transmitter {
    config: Config,
}

impl From<Config> for Transmitter {
    fn from(value: Config) -> Self {
        Self { config: value }
    }
}

impl Transmitter {
    /// Open the encrypted connection and run the submission. The connection
    /// is aborted on any step failure and dropped on every exit path.
    pub fn transmit(&self) -> Result<()> {
        let sender: Address = self.config.from.parse().context(AddressSnafu {
            kind: "sender",
            address: self.config.from.clone(),
        })?;
        let recipient: Address = self.config.to.parse().context(AddressSnafu {
            kind: "recipient",
            address: self.config.to.clone(),
        })?;
        let message = super::format_message(&self.config);

        // Server identity is checked against the configured host name.
        let tls = TlsParameters::new(self.config.smtp_host.clone()).context(TlsSnafu {
            host: self.config.smtp_host.clone(),
        })?;

        let mut connection = SmtpConnection::connect(
            (self.config.smtp_host.as_str(), self.config.smtp_port),
            None,
            &ClientId::default(),
            Some(&tls),
            None,
        )
        .context(ConnectSnafu {
            host: self.config.smtp_host.clone(),
            port: self.config.smtp_port,
        })?;

        tracing::debug!(
            host = self.config.smtp_host.as_str(),
            port = self.config.smtp_port,
            "Connected"
        );

        let result = self.submit(&mut connection, &sender, &recipient, message.as_bytes());
        if result.is_err() {
            connection.abort();
        }
        result
    }

    fn submit<S: Session>(
        &self,
        session: &mut S,
        sender: &Address,
        recipient: &Address,
        message: &[u8],
    ) -> Result<()> {
        session.authenticate(&self.config.from, self.config.password.expose_secret())?;
        session.declare_sender(sender)?;
        session.declare_recipient(recipient)?;
        session.write_message(message)?;
        session.close()?;

        tracing::info!(
            recipient = self.config.to.as_str(),
            subject = self.config.subject.as_str(),
            "Mail sent"
        );
        Ok(())
    }
}
