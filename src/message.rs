//! Application message bodies for the send endpoint.
//!
//! A [`Message`] carries its recipients and delivery flags next to exactly one
//! [`MessageContent`] payload. The payload is flattened into the body and tagged by
//! `msgtype`, so a text message encodes as
//! `{"touser":"a|b","msgtype":"text","text":{"content":"hello"},...}`.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Most articles a single news or mpnews message may carry.
pub const MAX_ARTICLES: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub touser: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub toparty: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub totag: String,
    /// Filled from the client config when unset.
    #[serde(rename = "agentid", default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<i64>,
    #[serde(flatten)]
    pub content: MessageContent,
    #[serde(default)]
    pub safe: u8,
    #[serde(default)]
    pub enable_id_trans: u8,
    #[serde(default)]
    pub enable_duplicate_check: u8,
    #[serde(default)]
    pub duplicate_check_interval: u32,
}

impl Message {
    pub fn new(content: MessageContent) -> Self {
        Self {
            touser: String::new(),
            toparty: String::new(),
            totag: String::new(),
            agent_id: None,
            content,
            safe: 0,
            enable_id_trans: 0,
            enable_duplicate_check: 0,
            duplicate_check_interval: 0,
        }
    }

    /// Recipient user ids; `"@all"` addresses everyone visible to the app.
    pub fn to_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.touser = join_ids(users);
        self
    }

    pub fn to_parties<I, S>(mut self, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.toparty = join_ids(parties);
        self
    }

    pub fn to_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.totag = join_ids(tags);
        self
    }

    /// Overrides the client's agent id; `0` counts as unset.
    pub fn agent_id(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Marks the message confidential (no forwarding, watermarked).
    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = u8::from(safe);
        self
    }

    pub fn enable_id_trans(mut self, enable: bool) -> Self {
        self.enable_id_trans = u8::from(enable);
        self
    }

    /// Enables duplicate suppression within `interval_secs`.
    pub fn duplicate_check(mut self, interval_secs: u32) -> Self {
        self.enable_duplicate_check = 1;
        self.duplicate_check_interval = interval_secs;
        self
    }

    pub fn msg_type(&self) -> &'static str {
        self.content.msg_type()
    }

    pub fn has_recipients(&self) -> bool {
        !(self.touser.is_empty() && self.toparty.is_empty() && self.totag.is_empty())
    }

    /// Checks that must pass before the message is worth sending.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_recipients() {
            return Err(ValidationError::MissingRecipients);
        }
        let articles = match &self.content {
            MessageContent::News { news } => Some(news.articles.len()),
            MessageContent::MpNews { mpnews } => Some(mpnews.articles.len()),
            _ => None,
        };
        match articles {
            Some(count) if count == 0 || count > MAX_ARTICLES => {
                Err(ValidationError::ArticleCount {
                    count,
                    max: MAX_ARTICLES,
                })
            }
            _ => Ok(()),
        }
    }
}

fn join_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}

/// The one payload a message carries, keyed on the wire by `msgtype`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: TextContent },
    Image { image: MediaContent },
    Voice { voice: MediaContent },
    Video { video: VideoContent },
    File { file: MediaContent },
    TextCard { textcard: TextCardContent },
    News { news: NewsContent },
    MpNews { mpnews: MpNewsContent },
    Markdown { markdown: TextContent },
}

impl MessageContent {
    pub fn text(content: impl Into<String>) -> Self {
        MessageContent::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        MessageContent::Image {
            image: MediaContent::new(media_id),
        }
    }

    pub fn voice(media_id: impl Into<String>) -> Self {
        MessageContent::Voice {
            voice: MediaContent::new(media_id),
        }
    }

    pub fn video(
        media_id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        MessageContent::Video {
            video: VideoContent {
                media_id: media_id.into(),
                title,
                description,
            },
        }
    }

    pub fn file(media_id: impl Into<String>) -> Self {
        MessageContent::File {
            file: MediaContent::new(media_id),
        }
    }

    pub fn text_card(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        MessageContent::TextCard {
            textcard: TextCardContent {
                title: title.into(),
                description: description.into(),
                url: url.into(),
                btntxt: None,
            },
        }
    }

    pub fn news(articles: Vec<NewsArticle>) -> Self {
        MessageContent::News {
            news: NewsContent { articles },
        }
    }

    pub fn mpnews(articles: Vec<MpNewsArticle>) -> Self {
        MessageContent::MpNews {
            mpnews: MpNewsContent { articles },
        }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        MessageContent::Markdown {
            markdown: TextContent {
                content: content.into(),
            },
        }
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            MessageContent::Text { .. } => "text",
            MessageContent::Image { .. } => "image",
            MessageContent::Voice { .. } => "voice",
            MessageContent::Video { .. } => "video",
            MessageContent::File { .. } => "file",
            MessageContent::TextCard { .. } => "textcard",
            MessageContent::News { .. } => "news",
            MessageContent::MpNews { .. } => "mpnews",
            MessageContent::Markdown { .. } => "markdown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaContent {
    pub media_id: String,
}

impl MediaContent {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoContent {
    pub media_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextCardContent {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Button label, platform default "详情" when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btntxt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsContent {
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagepath: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MpNewsContent {
    pub articles: Vec<MpNewsArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MpNewsArticle {
    pub title: String,
    pub thumb_media_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}
