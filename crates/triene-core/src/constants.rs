/// Content calendar and automation constants

/// Number of days in a generated content outline
pub const OUTLINE_DAYS: u32 = 30;

/// Post objectives, cycled by day index
pub const OBJECTIVES: [&str; 5] = ["Engajamento", "Autoridade", "Venda", "Educativo", "Institucional"];

/// Image formats, cycled by day index
pub const IMAGE_TYPES: [&str; 5] = ["Carrossel", "Mockup", "Quote visual", "Infográfico", "Reels capa"];

/// Base themes, cycled by day index and suffixed with `#{day}`
pub const THEMES_BASE: [&str; 10] = [
    "Bastidores da agência",
    "Resultado de cliente",
    "Framework de campanha",
    "Tendência do nicho",
    "Oferta do mês",
    "Dica prática de mídia paga",
    "História de sucesso",
    "Checklist rápido",
    "Quebra de objeção",
    "Convite para conversa",
];

/// Placeholder renderer endpoints
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://dummyimage.com/600x400/0f172a/ffffff.png";
pub const EDITED_IMAGE_BASE: &str = "https://dummyimage.com/600x400/f97316/ffffff.png";

/// Flow assigned when no trigger tag matches
pub const DEFAULT_FLOW_ID: &str = "flow_padrao";

/// Handle used in the analysis summary when none is given
pub const DEFAULT_INSTAGRAM_HANDLE: &str = "cliente";

/// Cosmetic delay for simulated provider calls
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1500;

/// Upper bound on one dispatch attempt
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Default export file names
pub const CALENDAR_EXPORT_FILE: &str = "cronograma_conteudo.json";
pub const LEADS_EXPORT_FILE: &str = "leads_triene.csv";
