/// 每个投票周期的秒数
pub const SECONDS_PER_PERIOD: i64 = 86_400;

/// 默认每日重置时刻（UTC 小时）
pub const DEFAULT_RESET_HOUR_UTC: u32 = 7;

/// 默认轮换起始日期
pub const DEFAULT_START_DATE: &str = "2025-07-30";

/// 周期日期字符串格式
pub const PERIOD_DATE_FORMAT: &str = "%Y-%m-%d";

/// 默认颜色命名服务地址
pub const DEFAULT_COLOR_API_URL: &str = "https://www.thecolorapi.com";

/// 颜色命名请求超时（毫秒）
pub const DEFAULT_COLOR_API_TIMEOUT_MS: u64 = 2_500;

/// 访客指纹最大长度
pub const MAX_FINGERPRINT_LEN: usize = 512;

/// 单词文本最大长度
pub const MAX_WORD_LEN: usize = 64;

/// 投票成功提示
pub const VOTE_RECORDED_MESSAGE: &str = "Vote recorded successfully";
