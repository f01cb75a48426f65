//! UI copy for the two supported languages.
//!
//! Static labels in the page carry `data-i18n="<key>"`; `Strings::lookup`
//! resolves those keys. Transaction messages live in `view`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code {
            "zh" => Language::Zh,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// BCP 47 tag used for date formatting.
    pub fn locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Zh => "zh-CN",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }
}

pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub connect_wallet: &'static str,
    pub disconnect: &'static str,
    pub add_record: &'static str,
    pub refresh: &'static str,
    pub refreshing: &'static str,
    pub no_records: &'static str,
    pub create_first: &'static str,
    pub domain: &'static str,
    pub ip_address: &'static str,
    pub owner: &'static str,
    pub date: &'static str,
    pub status: &'static str,
    pub actions: &'static str,
    pub verify: &'static str,
    pub reject: &'static str,
    pub submit: &'static str,
    pub submitting: &'static str,
    pub cancel: &'static str,
    pub project_intro: &'static str,
    pub stats_title: &'static str,
    pub total_records: &'static str,
    pub verified: &'static str,
    pub pending: &'static str,
    pub rejected: &'static str,
    pub faq_title: &'static str,
    pub search_placeholder: &'static str,
    pub language: &'static str,
    pub fhe_notice: &'static str,
    pub fhe_powered: &'static str,
    pub records_title: &'static str,
    pub loading: &'static str,
    pub connect_failed: &'static str,
    pub faq_items: &'static [(&'static str, &'static str)],
}

impl Strings {
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        let text = match key {
            "title" => self.title,
            "subtitle" => self.subtitle,
            "connectWallet" => self.connect_wallet,
            "disconnect" => self.disconnect,
            "addRecord" => self.add_record,
            "refresh" => self.refresh,
            "noRecords" => self.no_records,
            "createFirst" => self.create_first,
            "domain" => self.domain,
            "ipAddress" => self.ip_address,
            "owner" => self.owner,
            "date" => self.date,
            "status" => self.status,
            "actions" => self.actions,
            "verify" => self.verify,
            "reject" => self.reject,
            "submit" => self.submit,
            "cancel" => self.cancel,
            "projectIntro" => self.project_intro,
            "statsTitle" => self.stats_title,
            "totalRecords" => self.total_records,
            "verified" => self.verified,
            "pending" => self.pending,
            "rejected" => self.rejected,
            "faqTitle" => self.faq_title,
            "language" => self.language,
            "fheNotice" => self.fhe_notice,
            "fhePowered" => self.fhe_powered,
            "recordsTitle" => self.records_title,
            "loading" => self.loading,
            _ => return None,
        };
        Some(text)
    }

    pub fn fields_required(&self) -> String {
        format!("{} and {} are required", self.domain, self.ip_address)
    }
}

static EN: Strings = Strings {
    title: "PrivateDNS",
    subtitle: "Decentralized Encrypted Domain Resolution",
    connect_wallet: "Connect Wallet",
    disconnect: "Disconnect",
    add_record: "Add Domain",
    refresh: "Refresh",
    refreshing: "Refreshing...",
    no_records: "No domain records found",
    create_first: "Create First Record",
    domain: "Domain",
    ip_address: "IP Address",
    owner: "Owner",
    date: "Date",
    status: "Status",
    actions: "Actions",
    verify: "Verify",
    reject: "Reject",
    submit: "Submit Securely",
    submitting: "Encrypting with FHE...",
    cancel: "Cancel",
    project_intro: "PrivateDNS leverages FHE technology to resolve domains while keeping queries encrypted",
    stats_title: "Resolution Statistics",
    total_records: "Total Records",
    verified: "Verified",
    pending: "Pending",
    rejected: "Rejected",
    faq_title: "Frequently Asked Questions",
    search_placeholder: "Search domains...",
    language: "Language",
    fhe_notice: "Your domain queries are encrypted with Zama FHE",
    fhe_powered: "FHE-Powered Privacy",
    records_title: "Encrypted Domain Records",
    loading: "Initializing encrypted connection...",
    connect_failed: "Failed to connect wallet",
    faq_items: &[
        (
            "How does FHE protect my queries?",
            "Fully Homomorphic Encryption allows processing encrypted data without decryption",
        ),
        (
            "Is my domain information public?",
            "No, all domain-IP mappings are encrypted on-chain",
        ),
        (
            "Can I resolve .eth domains?",
            "Yes, we support all DNS-compatible domains",
        ),
        (
            "How long does resolution take?",
            "Typically under 3 seconds thanks to FHE acceleration",
        ),
    ],
};

static ZH: Strings = Strings {
    title: "PrivateDNS",
    subtitle: "去中心化加密域名解析",
    connect_wallet: "连接钱包",
    disconnect: "断开连接",
    add_record: "添加域名",
    refresh: "刷新",
    refreshing: "刷新中...",
    no_records: "未找到域名记录",
    create_first: "创建第一条记录",
    domain: "域名",
    ip_address: "IP地址",
    owner: "所有者",
    date: "日期",
    status: "状态",
    actions: "操作",
    verify: "验证",
    reject: "拒绝",
    submit: "安全提交",
    submitting: "使用FHE加密中...",
    cancel: "取消",
    project_intro: "PrivateDNS利用FHE技术解析域名，同时保持查询加密",
    stats_title: "解析统计",
    total_records: "总记录数",
    verified: "已验证",
    pending: "待处理",
    rejected: "已拒绝",
    faq_title: "常见问题",
    search_placeholder: "搜索域名...",
    language: "语言",
    fhe_notice: "您的域名查询使用Zama FHE加密",
    fhe_powered: "FHE驱动的隐私保护",
    records_title: "加密域名记录",
    loading: "正在初始化加密连接...",
    connect_failed: "钱包连接失败",
    faq_items: &[
        ("FHE如何保护我的查询？", "全同态加密允许在不解密的情况下处理加密数据"),
        ("我的域名信息是公开的吗？", "不，所有域名-IP映射都在链上加密存储"),
        ("我可以解析.eth域名吗？", "是的，我们支持所有DNS兼容域名"),
        ("解析需要多长时间？", "通常不到3秒，这得益于FHE加速"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_english() {
        assert_eq!(Language::from_code("zh"), Language::Zh);
        assert_eq!(Language::from_code("fr"), Language::En);
        assert_eq!(Language::from_code(Language::Zh.code()), Language::Zh);
    }

    #[test]
    fn lookup_resolves_page_keys() {
        assert_eq!(EN.lookup("addRecord"), Some("Add Domain"));
        assert_eq!(ZH.lookup("addRecord"), Some("添加域名"));
        assert_eq!(EN.lookup("nonexistent"), None);
    }

    #[test]
    fn both_languages_carry_the_same_faq_length() {
        assert_eq!(EN.faq_items.len(), ZH.faq_items.len());
    }

    #[test]
    fn required_fields_message_uses_localized_labels() {
        assert_eq!(EN.fields_required(), "Domain and IP Address are required");
        assert_eq!(ZH.fields_required(), "域名 and IP地址 are required");
    }
}
