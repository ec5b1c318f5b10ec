use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Common `errcode`/`errmsg` discriminant carried by every business response.
pub trait ApiReply: Sized {
    fn errcode(&self) -> i64;
    fn errmsg(&self) -> &str;

    fn is_success(&self) -> bool {
        self.errcode() == 0
    }

    fn into_result(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Api {
                code: self.errcode(),
                message: self.errmsg().to_string(),
            })
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AccessTokenResponse {
    pub errcode: i64,
    pub errmsg: String,
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SendMessageResponse {
    pub errcode: i64,
    pub errmsg: String,
    pub invaliduser: String,
    pub invalidparty: String,
    pub invalidtag: String,
    pub unlicenseduser: String,
    pub msgid: String,
    pub response_code: String,
}

impl SendMessageResponse {
    /// True when the send succeeded but some recipients were not reached.
    pub fn has_undelivered(&self) -> bool {
        !(self.invaliduser.is_empty()
            && self.invalidparty.is_empty()
            && self.invalidtag.is_empty()
            && self.unlicenseduser.is_empty())
    }
}

impl ApiReply for SendMessageResponse {
    fn errcode(&self) -> i64 {
        self.errcode
    }

    fn errmsg(&self) -> &str {
        &self.errmsg
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GetUserIdResponse {
    pub errcode: i64,
    pub errmsg: String,
    pub userid: String,
}

impl ApiReply for GetUserIdResponse {
    fn errcode(&self) -> i64 {
        self.errcode
    }

    fn errmsg(&self) -> &str {
        &self.errmsg
    }

    // This endpoint signals success through errmsg alone.
    fn is_success(&self) -> bool {
        self.errmsg == "ok"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UploadMediaResponse {
    pub errcode: i64,
    pub errmsg: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub media_id: String,
    pub created_at: String,
}

impl UploadMediaResponse {
    /// Upload time parsed from the `created_at` seconds string.
    pub fn created_at_timestamp(&self) -> Option<jiff::Timestamp> {
        let secs: i64 = self.created_at.parse().ok()?;
        jiff::Timestamp::from_second(secs).ok()
    }
}

impl ApiReply for UploadMediaResponse {
    fn errcode(&self) -> i64 {
        self.errcode
    }

    fn errmsg(&self) -> &str {
        &self.errmsg
    }
}
