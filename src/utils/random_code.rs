use rand::Rng;

/// 去掉易混淆字符（0/O、1/I/L）的字符集
pub const UNAMBIGUOUS_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机码
pub fn generate_random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..UNAMBIGUOUS_CHARSET.len());
            UNAMBIGUOUS_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_uses_charset() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| UNAMBIGUOUS_CHARSET.contains(&b)));
        assert!(!code.contains('O') && !code.contains('0') && !code.contains('I'));
    }
}
