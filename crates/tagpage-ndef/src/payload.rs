#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum NdefPayload {
    Text(TextPayload),
    Uri(String),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

/// URI prefix codes as defined in NFC Forum RTD URI specification
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// Expand a URI record payload, the first byte is an index into [`URI_PREFIXES`]
///
/// Codes past the end of the table are reserved and expand to no prefix
pub fn expand_uri(payload: &[u8]) -> Option<String> {
    let (code, rest) = payload.split_first()?;
    let prefix = URI_PREFIXES.get(*code as usize).copied().unwrap_or_default();

    Some(format!("{prefix}{}", String::from_utf8_lossy(rest)))
}

/// Inverse of [`expand_uri`], picks the longest matching prefix
pub fn compress_uri(uri: &str) -> Vec<u8> {
    let (code, prefix) = URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(*prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .unwrap_or((0, &""));

    let mut bytes = Vec::with_capacity(1 + uri.len() - prefix.len());
    bytes.push(code as u8);
    bytes.extend_from_slice(&uri.as_bytes()[prefix.len()..]);
    bytes
}

impl NdefPayload {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            NdefPayload::Text(text) => text.to_bytes(),
            NdefPayload::Uri(uri) => compress_uri(uri),
            NdefPayload::Data(data) => data.clone(),
        }
    }

    pub fn text(&self) -> Option<&TextPayload> {
        match self {
            NdefPayload::Text(text) => Some(text),
            _ => None,
        }
    }
}
