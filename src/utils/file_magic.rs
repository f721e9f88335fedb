//! 按文件头识别上传内容
//!
//! 学校上传以证件照、扫描件、作业文档与课堂录音为主；
//! 扩展名只作声明，实际类型以文件头为准。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Pdf,
    /// OLE 复合文档（.doc/.xls/.ppt）
    LegacyOffice,
    /// ZIP 容器（.docx/.xlsx/.pptx/.odt/.zip）
    Zip,
    Mp3,
    Mp4,
    Ogg,
}

const SIGNATURES: &[(FileKind, &[u8])] = &[
    (FileKind::Png, b"\x89PNG\r\n\x1a\n"),
    (FileKind::Jpeg, b"\xFF\xD8\xFF"),
    (FileKind::Gif, b"GIF87a"),
    (FileKind::Gif, b"GIF89a"),
    (FileKind::Pdf, b"%PDF-"),
    (FileKind::LegacyOffice, b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1"),
    (FileKind::Zip, b"PK\x03\x04"),
    (FileKind::Mp3, b"ID3"),
    (FileKind::Mp3, b"\xFF\xFB"),
    (FileKind::Ogg, b"OggS"),
];

/// 识别文件头，无法识别时返回 None
pub fn sniff(data: &[u8]) -> Option<FileKind> {
    if let Some((kind, _)) = SIGNATURES.iter().find(|(_, sig)| data.starts_with(sig)) {
        return Some(*kind);
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some(FileKind::Webp);
    }
    // ISO BMFF: 第 4..8 字节为 "ftyp"
    if data.len() >= 8 && &data[4..8] == b"ftyp" {
        return Some(FileKind::Mp4);
    }
    None
}

fn expected_kinds(extension: &str) -> Option<&'static [FileKind]> {
    let kinds: &'static [FileKind] = match extension {
        ".png" => &[FileKind::Png],
        ".jpg" | ".jpeg" => &[FileKind::Jpeg],
        ".gif" => &[FileKind::Gif],
        ".webp" => &[FileKind::Webp],
        ".pdf" => &[FileKind::Pdf],
        ".doc" | ".xls" | ".ppt" => &[FileKind::LegacyOffice],
        ".docx" | ".xlsx" | ".pptx" | ".odt" | ".ods" | ".zip" => &[FileKind::Zip],
        ".mp3" => &[FileKind::Mp3],
        ".mp4" | ".m4a" => &[FileKind::Mp4],
        ".ogg" => &[FileKind::Ogg],
        _ => return None,
    };
    Some(kinds)
}

fn is_plain_text(extension: &str) -> bool {
    matches!(extension, ".txt" | ".csv" | ".md")
}

/// 校验文件头与扩展名（带点）是否一致；纯文本不校验文件头，未知扩展名一律拒绝
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }
    let extension = extension.to_ascii_lowercase();
    if is_plain_text(&extension) {
        // 文本文件里出现 NUL 基本可以认定是伪装的二进制
        return !data.contains(&0);
    }
    match (expected_kinds(&extension), sniff(data)) {
        (Some(expected), Some(actual)) => expected.contains(&actual),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_signatures() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(sniff(png), Some(FileKind::Png));
        assert!(validate_magic_bytes(png, ".PNG"));
        assert!(!validate_magic_bytes(png, ".jpg"));
        assert!(validate_magic_bytes(b"\xFF\xD8\xFF\xE0\0\x10JFIF", ".jpeg"));
    }

    #[test]
    fn test_report_card_scans() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7\n", ".docx"));
        assert!(validate_magic_bytes(b"PK\x03\x04\x14\0", ".docx"));
    }

    #[test]
    fn test_recordings() {
        assert!(validate_magic_bytes(b"ID3\x04\0\0", ".mp3"));
        assert!(validate_magic_bytes(b"\0\0\0\x20ftypM4A ", ".m4a"));
    }

    #[test]
    fn test_text_rejects_binary() {
        assert!(validate_magic_bytes("nom;note\nAwa;15".as_bytes(), ".csv"));
        assert!(!validate_magic_bytes(b"MZ\x90\0\x03\0", ".txt"));
    }

    #[test]
    fn test_unknown_or_empty() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(b"MZ\x90\0", ".exe"));
        assert!(!validate_magic_bytes(b"random bytes", ".png"));
    }
}
