use {
    anyhow::Result,
    clap::{Args, Subcommand},
    sendtick::{Call, ContactUpdate, ListOptions, NewContact, SendMessage, SendtickApi},
    tracing::debug,
};

use crate::print_json;

#[derive(Args)]
pub struct SendArgs {
    /// Phone number with country code, or a full WhatsApp JID.
    #[arg(long)]
    pub to: String,
    /// WhatsApp session to send from.
    #[arg(long, env = "SENDTICK_SESSION_ID")]
    pub session_id: String,
    /// Message text.
    #[arg(short, long, default_value = "")]
    pub message: String,
    /// Public URL of media to send.
    #[arg(long, default_value = "")]
    pub media_url: String,
    /// File name for document messages.
    #[arg(long, default_value = "")]
    pub file_name: String,
}

impl SendArgs {
    pub fn into_call(self) -> Call {
        Call::SendMessage(SendMessage {
            session_id: self.session_id,
            to: self.to,
            message: self.message,
            media_url: self.media_url,
            file_name: self.file_name,
        })
    }
}

/// Paging flags shared by the `list` subcommands.
#[derive(Args)]
pub struct ListArgs {
    /// Maximum number of results.
    #[arg(long, conflicts_with = "all")]
    pub limit: Option<u64>,
    /// Return every result.
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        match (args.all, args.limit) {
            (true, _) => ListOptions::all(),
            (false, Some(limit)) => ListOptions::limit(limit),
            (false, None) => ListOptions::default(),
        }
    }
}

#[derive(Subcommand)]
pub enum ContactAction {
    /// List contacts.
    List(ListArgs),
    /// Show one contact.
    Get { id: String },
    /// Create a contact.
    Create {
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Change a contact's name or email.
    Update {
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Delete a contact.
    Delete { id: String },
}

impl ContactAction {
    pub fn into_call(self) -> Call {
        match self {
            Self::List(args) => Call::ListContacts(args.into()),
            Self::Get { id } => Call::GetContact { contact_id: id },
            Self::Create { phone, name, email } => {
                Call::CreateContact(NewContact { phone, name, email })
            },
            Self::Update { id, name, email } => Call::UpdateContact {
                contact_id: id,
                update: ContactUpdate { name, email },
            },
            Self::Delete { id } => Call::DeleteContact { contact_id: id },
        }
    }
}

#[derive(Subcommand)]
pub enum MediaAction {
    /// Upload a file the server fetches from a public URL.
    Upload { url: String },
    /// Show one media item.
    Get { id: String },
    /// List media.
    List(ListArgs),
}

impl MediaAction {
    pub fn into_call(self) -> Call {
        match self {
            Self::Upload { url } => Call::UploadMedia { file_url: url },
            Self::Get { id } => Call::GetMedia { media_id: id },
            Self::List(args) => Call::ListMedia(args.into()),
        }
    }
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// List WhatsApp sessions.
    List(ListArgs),
    /// Show one session.
    Get { id: String },
}

impl SessionAction {
    pub fn into_call(self) -> Call {
        match self {
            Self::List(args) => Call::ListSessions(args.into()),
            Self::Get { id } => Call::GetSession { session_id: id },
        }
    }
}

/// Send `call` and print the response, or print the planned request.
pub async fn execute(api: &SendtickApi, call: Call, dry_run: bool) -> Result<()> {
    debug!(resource = %call.resource(), operation = %call.operation(), dry_run, "cli call");
    if dry_run {
        let spec = api.plan(&call)?;
        return print_json(&serde_json::to_value(&spec)?);
    }
    let response = api.call(&call).await?;
    print_json(&response)
}
