use crate::core::{ConfigProvider, Mailer};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse()
        .map_err(|source| ReportError::AddressError {
            address: address.to_string(),
            source,
        })
}

/// Resolve the primary recipient and the cc list, dropping any cc entry that
/// repeats the primary address or an earlier cc. The envelope lettre derives
/// from these headers is then exactly {to} ∪ {cc}.
pub fn recipient_mailboxes<C: ConfigProvider + ?Sized>(config: &C) -> Result<(Mailbox, Vec<Mailbox>)> {
    let to = parse_mailbox(config.to_address())?;
    let mut cc: Vec<Mailbox> = Vec::new();

    for address in config.cc_addresses() {
        let mailbox = parse_mailbox(address)?;
        if mailbox.email == to.email || cc.iter().any(|seen| seen.email == mailbox.email) {
            continue;
        }
        cc.push(mailbox);
    }

    Ok((to, cc))
}

/// Build the multipart message: From/To/Cc/Date/Subject headers, a plain-text
/// body part, and the workbook as a base64 octet-stream attachment carrying
/// the artifact's filename.
pub fn build_message<C: ConfigProvider + ?Sized>(
    config: &C,
    file_name: &str,
    content: Vec<u8>,
) -> Result<Message> {
    let (to, cc) = recipient_mailboxes(config)?;

    let mut builder = Message::builder()
        .from(parse_mailbox(config.from_address())?)
        .to(to)
        .date_now()
        .subject(config.subject());

    for mailbox in cc {
        builder = builder.cc(mailbox);
    }

    let content_type: ContentType = "application/octet-stream".parse()?;
    let attachment = Attachment::new(file_name.to_string()).body(content, content_type);

    let message = builder.multipart(
        MultiPart::mixed()
            .singlepart(SinglePart::plain(config.body_text().to_string()))
            .singlepart(attachment),
    )?;

    Ok(message)
}

/// SMTP submission via lettre: TCP connect, STARTTLS upgrade, then
/// username/password authentication against the relay.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpMailer {
    pub fn new(host: String, port: u16, username: String, password: String) -> Self {
        Self {
            host,
            port,
            credentials: Credentials::new(username, password),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<String> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();

        let response = transport.send(message).await?;
        Ok(response.code().to_string())
    }
}
