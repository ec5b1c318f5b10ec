use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::{
    Config, Error, WeComClient,
    errors::{AuthError, ValidationError},
    media::{MediaKind, validate_media},
    message::{Message, MessageContent},
    token::{Credential, IssuedToken, TokenCache, TokenSnapshot},
    types::{AccessTokenResponse, ApiReply, GetUserIdResponse, SendMessageResponse, UploadMediaResponse},
};

const USER_AGENT: &str = "wecom-client-rust/0.1.0";

impl WeComClient {
    /// Create a new WeComClient
    /// # Arguments
    /// * `config` - Explicit configuration (`Config`), typically loaded via `Config::from_file` or `Config::from_env`.
    ///
    /// No request is made here; the first token is fetched lazily by the first call that needs one.
    pub fn new(config: Config) -> Result<Self, Error> {
        let base_url = config.resolved_base_url()?;
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        let cache = TokenCache::new(format!("token.refresh.{}", config.corp_id));
        Ok(WeComClient {
            http,
            base_url,
            credential: Credential::new(config.corp_id, config.corp_secret),
            agent_id: config.agent_id,
            cache: Arc::new(cache),
        })
    }

    pub fn agent_id(&self) -> i64 {
        self.agent_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a currently valid access token, authenticating only when the cached one
    /// is missing or expired.
    pub async fn access_token(&self) -> Result<String, Error> {
        let token = self
            .cache
            .obtain_token(|| self.fetch_token())
            .await?;
        Ok(token)
    }

    /// Forgets the cached token, e.g. after `Error::is_token_rejected`.
    pub async fn invalidate_token(&self) {
        self.cache.invalidate().await;
    }

    pub async fn token_snapshot(&self) -> Option<TokenSnapshot> {
        self.cache.snapshot().await
    }

    async fn fetch_token(&self) -> Result<IssuedToken, AuthError> {
        if !self.credential.is_complete() {
            return Err(AuthError::MissingCredentials);
        }
        let url = format!("{}/cgi-bin/gettoken", self.base_url);
        let body = self
            .http
            .get(&url)
            .query(&[
                ("corpid", self.credential.corp_id()),
                ("corpsecret", self.credential.corp_secret()),
            ])
            .send()
            .await?
            .text()
            .await?;
        let resp: AccessTokenResponse = serde_json::from_str(&body)?;

        if resp.errcode != 0 {
            error!(
                "token request rejected: corp_id='{}' errcode={} errmsg='{}'",
                self.credential.corp_id(),
                resp.errcode,
                resp.errmsg
            );
            return Err(AuthError::Rejected {
                code: resp.errcode,
                message: resp.errmsg,
            });
        }
        if resp.access_token.is_empty() {
            return Err(AuthError::Rejected {
                code: resp.errcode,
                message: "provider returned an empty access_token".to_string(),
            });
        }
        info!(
            "access token acquired (len={}, expires_in={}s)",
            resp.access_token.len(),
            resp.expires_in
        );
        Ok(IssuedToken {
            value: resp.access_token,
            expires_in: Duration::from_secs(resp.expires_in),
        })
    }

    /// Sends an application message. Recipients the platform could not reach are
    /// reported in the returned response, not as an error.
    pub async fn send(&self, mut message: Message) -> Result<SendMessageResponse, Error> {
        message.validate()?;
        // 0 is the platform's "unset" agent id
        if matches!(message.agent_id, None | Some(0)) {
            message.agent_id = Some(self.agent_id);
        }

        let token = self.access_token().await?;
        let url = format!("{}/cgi-bin/message/send", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("access_token", token.as_str())])
            .json(&message)
            .send()
            .await?;
        let reply: SendMessageResponse = read_reply(resp).await?;

        if reply.has_undelivered() {
            warn!(
                "message partially delivered: msgid='{}' invaliduser='{}' invalidparty='{}' invalidtag='{}' unlicenseduser='{}'",
                reply.msgid,
                reply.invaliduser,
                reply.invalidparty,
                reply.invalidtag,
                reply.unlicenseduser
            );
        } else {
            info!(
                "message sent: msgtype='{}' msgid='{}'",
                message.msg_type(),
                reply.msgid
            );
        }
        Ok(reply)
    }

    /// Sends plain text to the given user ids.
    pub async fn send_text<I, S>(
        &self,
        content: impl Into<String>,
        users: I,
    ) -> Result<SendMessageResponse, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.send(Message::new(MessageContent::text(content)).to_users(users))
            .await
    }

    /// Resolves a mobile number to the platform user id.
    pub async fn get_user_id(&self, mobile: &str) -> Result<String, Error> {
        let mobile = mobile.trim();
        if mobile.is_empty() {
            return Err(ValidationError::EmptyMobile.into());
        }

        let token = self.access_token().await?;
        let url = format!("{}/cgi-bin/user/getuserid", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("access_token", token.as_str())])
            .json(&serde_json::json!({ "mobile": mobile }))
            .send()
            .await?;
        let reply: GetUserIdResponse = read_reply(resp).await?;
        if reply.userid.is_empty() {
            return Err(Error::Api {
                code: reply.errcode,
                message: "response is missing userid".to_string(),
            });
        }
        Ok(reply.userid)
    }

    /// Validates and uploads a local file as temporary media.
    pub async fn upload_media(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<UploadMediaResponse, Error> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(ValidationError::MissingFileName)?
            .to_string();
        let size = tokio::fs::metadata(path).await?.len();
        validate_media(kind, size, &file_name)?;

        let bytes = tokio::fs::read(path).await?;
        self.upload(kind, file_name, bytes).await
    }

    /// Validates and uploads in-memory content as temporary media.
    pub async fn upload_media_bytes(
        &self,
        kind: MediaKind,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<UploadMediaResponse, Error> {
        let file_name = file_name.into();
        validate_media(kind, bytes.len() as u64, &file_name)?;
        self.upload(kind, file_name, bytes).await
    }

    async fn upload(
        &self,
        kind: MediaKind,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadMediaResponse, Error> {
        let size = bytes.len();
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new().part("media", part);

        let token = self.access_token().await?;
        let url = format!("{}/cgi-bin/media/upload", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("access_token", token.as_str()), ("type", kind.as_str())])
            .multipart(form)
            .send()
            .await?;
        let reply: UploadMediaResponse = read_reply(resp).await?;
        info!(
            "media uploaded: type='{}' file='{}' bytes={} media_id='{}'",
            kind, file_name, size, reply.media_id
        );
        Ok(reply)
    }
}

/// Checks the HTTP status, decodes the body and applies the endpoint's success discriminant.
async fn read_reply<T>(resp: Response) -> Result<T, Error>
where
    T: DeserializeOwned + ApiReply,
{
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        error!("request failed: status={} body='{}'", status, body);
        return Err(Error::HttpStatus(status, body));
    }
    let reply: T = serde_json::from_str(&body)?;
    reply.into_result().inspect_err(|err| {
        error!("platform returned an error: {}", err);
    })
}
