use crate::constants::{CONTENT_TYPE_JSON, QUERY_ENCODE_SET, X_DATE};
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;
use vidgen_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use vidgen_core::time::{format_date, format_iso8601, now, DateTime};
use vidgen_core::{Context, Error, Result, SignRequest, SigningRequest};

/// RequestSigner that implements the keyed-hash request signing scheme.
///
/// The scheme is a classic canonical-request design: the request is
/// serialized into a byte-exact canonical form, hashed, bound to a
/// `{date}/{region}/{service}/request` scope and signed with a key derived
/// from the secret through a four-stage HMAC chain. The derived key is only
/// valid for the scope's date, so it is recomputed on every call and never
/// cached.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region scope.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        parts: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no credentials available for signing",
            ));
        };
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid("access key pair is incomplete"));
        }

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(parts)?;

        // canonicalize context
        canonicalize_header(&mut signed_req, now)?;
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, &hex_sha256(body))?;
        debug!("calculated canonical request:\n{creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/request"
        let scope = format!(
            "{}/{}/{}/request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "HMAC-SHA256")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = signing_key(
            &cred.secret_access_key,
            now,
            &self.region,
            &self.service,
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_req.header_name_to_vec_sorted().join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(parts)
    }
}

fn canonical_request_string(ctx: &SigningRequest, payload_hash: &str) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert path
    writeln!(f, "{}", ctx.path)?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert headers
    let signed_headers = ctx.header_name_to_vec_sorted();
    for header in signed_headers.iter() {
        let value = &ctx.headers[*header];
        writeln!(f, "{}:{}", header, value.to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    // Insert payload hash
    write!(f, "{payload_hash}")?;

    Ok(f)
}

fn canonicalize_header(ctx: &mut SigningRequest, now: DateTime) -> Result<()> {
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Host, X-Date and Content-Type are always part of what gets signed;
    // caller-supplied values for them are replaced.
    ctx.headers
        .insert(header::HOST, HeaderValue::from_str(ctx.authority.as_str())?);
    ctx.headers
        .insert(X_DATE, HeaderValue::from_str(&format_iso8601(now))?);
    ctx.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CONTENT_TYPE_JSON),
    );

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Encode keys and values independently, then order by encoded key with
    // the encoded value as tie-breaker for duplicate keys.
    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    ctx.query.sort();
}

/// Derive the per-request signing key.
///
/// Four nested HMAC-SHA256 stages, each output keying the next:
/// date, region, service, then the literal `"request"`.
pub(crate) fn signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());

    hmac_sha256(sign_service.as_slice(), "request".as_bytes())
}
