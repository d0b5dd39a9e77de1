//! Hardcoded mock records the application starts with

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use triene_types::{
    CadenceFlow, CadenceStep, Channel, FlowId, IntegrationConfig, IntegrationProvider, Lead, LeadId,
    LeadStatus, LogEntry, LogType, StyleGuide,
};

fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn custom_data(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn whatsapp(step: u32, day: u32, title: &str, content: &str) -> CadenceStep {
    CadenceStep {
        step,
        day,
        channel: Channel::Whatsapp,
        title: title.to_string(),
        content: content.to_string(),
        subject: None,
    }
}

fn email(step: u32, day: u32, title: &str, subject: &str, content: &str) -> CadenceStep {
    CadenceStep {
        step,
        day,
        channel: Channel::Email,
        title: title.to_string(),
        content: content.to_string(),
        subject: Some(subject.to_string()),
    }
}

pub fn default_style_guide() -> StyleGuide {
    StyleGuide {
        colors: "Azul escuro, branco e detalhes em neon".to_string(),
        fonts: "Sans-serif condensada e títulos em bold".to_string(),
        elements: "Formas geométricas, ícones minimalistas, mockups de smartphones".to_string(),
        aesthetics: "Feed limpo com contraste e layouts modulares".to_string(),
        persona: "Fundadores e CMOs de startups digitais".to_string(),
        niche: "Marketing de performance".to_string(),
        cta: "Fale com nosso time via WhatsApp".to_string(),
    }
}

pub fn default_integration() -> IntegrationConfig {
    IntegrationConfig {
        provider: IntegrationProvider::Digisac,
        api_url: "https://api.digisac.io/v1".to_string(),
        token: "sk_test_simulacao_token_123".to_string(),
        is_connected: true,
    }
}

pub fn mock_cadences() -> Vec<CadenceFlow> {
    vec![
        CadenceFlow {
            id: FlowId::new("flow_padrao"),
            name: "Fluxo Padrão (Leads Frios)".to_string(),
            trigger_tag: "Frio".to_string(),
            steps: vec![
                whatsapp(1, 0, "Boas Vindas", "Olá [Nome], vi seu cadastro na Triene. Podemos conversar?"),
                email(2, 1, "Case de Sucesso", "Veja como a Empresa X cresceu", "Oi [Nome], segue um estudo de caso..."),
                whatsapp(3, 2, "Cobrança", "Eai [Nome], conseguiu ver o email?"),
            ],
        },
        CadenceFlow {
            id: FlowId::new("flow_vip"),
            name: "Fluxo VIP (High Ticket)".to_string(),
            trigger_tag: "VIP".to_string(),
            steps: vec![
                whatsapp(1, 0, "Contato Pessoal", "Olá [Nome], sou o Diretor da Triene. Vi que você tem perfil VIP."),
                email(2, 0, "Proposta Formal", "Convite Exclusivo Triene", "Segue convite para reunião..."),
            ],
        },
    ]
}

pub fn mock_leads() -> Vec<Lead> {
    vec![
        Lead {
            id: LeadId::new(1),
            name: "Carlos Oliveira".to_string(),
            email: "carlos@empresa.com".to_string(),
            phone: "5511999991234".to_string(),
            company: "Tech Solutions".to_string(),
            tags: vec!["Frio".to_string(), "Facebook".to_string()],
            status: LeadStatus::InCadence,
            cadence_id: FlowId::new("flow_padrao"),
            current_step: 2,
            entered_at: seed_time(2023, 10, 25, 10, 0),
            custom_data: custom_data(&[
                ("cpf", "123.456.789-00"),
                ("city", "São Paulo"),
                ("source", "Facebook Ads"),
            ]),
            logs: vec![
                LogEntry::new(LogType::System, "Lead importado").at(seed_time(2023, 10, 25, 10, 0)),
                LogEntry::new(LogType::SentWa, "Boas Vindas enviada")
                    .at(seed_time(2023, 10, 25, 10, 5))
                    .with_provider("DigiSac"),
            ],
        },
        Lead {
            id: LeadId::new(2),
            name: "Mariana Silva".to_string(),
            email: "mariana@vip.com".to_string(),
            phone: "5521988887777".to_string(),
            company: "Grupo Silva".to_string(),
            tags: vec!["VIP".to_string()],
            status: LeadStatus::New,
            cadence_id: FlowId::new("flow_vip"),
            current_step: 0,
            entered_at: seed_time(2023, 10, 26, 14, 0),
            custom_data: custom_data(&[
                ("cpf", "987.654.321-11"),
                ("city", "Rio de Janeiro"),
                ("source", "Indicação"),
            ]),
            logs: vec![LogEntry::new(LogType::System, "Lead VIP cadastrado").at(seed_time(2023, 10, 26, 14, 0))],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_flows_are_contiguous() {
        for flow in mock_cadences() {
            for (index, step) in flow.steps.iter().enumerate() {
                assert_eq!(step.step, index as u32 + 1, "flow {} has a gap", flow.id);
            }
        }
    }

    #[test]
    fn test_seed_leads_reference_existing_flows() {
        let flows = mock_cadences();
        for lead in mock_leads() {
            assert!(flows.iter().any(|f| f.id == lead.cadence_id));
        }
    }
}
