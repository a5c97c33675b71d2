//! MIME type detection module
//!
//! Maps file extensions to Content-Type strings. The table is fixed at
//! compile time and lookups are case-insensitive.

/// Get the Content-Type for a file extension, without the leading dot.
///
/// Unknown or absent extensions fall back to `application/octet-stream`.
///
/// # Examples
/// ```
/// use servkit::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("html")), "text/html");
/// assert_eq!(content_type_for(Some("MP4")), "video/mp4");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
#[must_use]
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };
    lookup(&ext.to_ascii_lowercase())
}

fn lookup(ext: &str) -> &'static str {
    match ext {
        // Text
        "htm" | "html" | "shtml" => "text/html",
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "xml" | "rss" => "text/xml",
        "mml" => "text/mathml",
        "htc" => "text/x-component",

        // Scripts and data
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "jng" => "image/x-jng",
        "wbmp" => "image/vnd.wap.wbmp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mpg" | "mpeg" => "video/mpeg",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        "asf" | "asx" => "video/x-ms-asf",
        "mng" => "video/x-mng",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "ra" => "audio/x-realaudio",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "rar" => "application/x-rar-compressed",
        "jar" | "war" | "ear" => "application/java-archive",
        "rpm" => "application/x-redhat-package-manager",
        "swf" => "application/x-shockwave-flash",
        "crt" | "der" | "pem" => "application/x-x509-ca-cert",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type_for(Some("html")), "text/html");
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("json")), "application/json");
        assert_eq!(content_type_for(Some("png")), "image/png");
        assert_eq!(content_type_for(Some("mp4")), "video/mp4");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for(Some("HTML")), "text/html");
        assert_eq!(content_type_for(Some("Jpeg")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
