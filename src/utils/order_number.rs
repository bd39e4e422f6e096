use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 生成展示用订单号: ORD-<yyyymmddHHMMSS>-<8位随机十六进制>
///
/// 随机段取自 UUIDv4, 同一秒内并发下单也不会撞号; orders.order_number 上另有唯一索引兜底。
/// 订单号只用于展示, 查询与外键一律使用自增 id。
pub fn generate_order_number() -> String {
    generate_order_number_at(Utc::now())
}

pub fn generate_order_number_at(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        now.format("%Y%m%d%H%M%S"),
        random[..8].to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_order_number_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        let number = generate_order_number_at(at);

        assert!(number.starts_with("ORD-20250309140507-"));
        let suffix = number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_order_numbers_within_same_second_differ() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        let numbers: HashSet<String> = (0..500).map(|_| generate_order_number_at(at)).collect();
        assert_eq!(numbers.len(), 500);
    }
}
