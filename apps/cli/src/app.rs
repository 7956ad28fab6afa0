//! Interactive terminal application: renders the active screen, reads user
//! commands, and drives the project view. All side effects (extraction
//! tasks, the analysis request, clipboard, browser) happen here.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::{Color, Colorize};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::analysis::MatchAnalyzer;
use crate::errors::AppError;
use crate::extractor;
use crate::models::AnalysisResult;
use crate::project::{ExtractionJob, ProjectView};
use crate::screen::{Nav, Screen};
use crate::settings::{SettingsStore, UserSettings};
use crate::theme::ThemeColor;

type InputLines = Lines<BufReader<Stdin>>;
type ExtractionHandle = (String, JoinHandle<Result<String, AppError>>);

const ERROR_COLOR: Color = Color::TrueColor { r: 244, g: 63, b: 94 };

pub struct App {
    screen: Screen,
    settings: UserSettings,
    store: SettingsStore,
    analyzer: Arc<dyn MatchAnalyzer>,
    project: ProjectView,
    extractions: Vec<ExtractionHandle>,
}

impl App {
    pub fn new(
        settings: UserSettings,
        store: SettingsStore,
        analyzer: Arc<dyn MatchAnalyzer>,
    ) -> Self {
        Self {
            screen: Screen::Login,
            settings,
            store,
            analyzer,
            project: ProjectView::new(),
            extractions: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let keep_going = match self.screen {
                Screen::Login => self.login_screen(&mut lines).await?,
                Screen::Settings => self.settings_screen(&mut lines).await?,
                Screen::Project => self.project_screen(&mut lines).await?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn accent(&self) -> Color {
        self.settings.theme_color.style().accent
    }

    async fn login_screen(&mut self, lines: &mut InputLines) -> Result<bool> {
        println!();
        println!("{}", "MatchSkill".color(self.accent()).bold());
        println!("Compare seu currículo com uma vaga usando IA.");
        println!();

        let Some(input) = read_line(lines, "Pressione Enter para entrar ('sair' encerra): ").await?
        else {
            return Ok(false);
        };
        if input.trim().eq_ignore_ascii_case("sair") {
            return Ok(false);
        }

        // Any submission succeeds; there is no real authentication.
        self.navigate(Nav::LoginSubmitted);
        Ok(true)
    }

    async fn settings_screen(&mut self, lines: &mut InputLines) -> Result<bool> {
        println!();
        println!("{}", "Ajustes".color(self.accent()).bold());
        println!("Deixe em branco para manter o valor atual.");

        let mut draft = self.settings.clone();

        if let Some(name) = read_line(lines, &format!("Nome [{}]: ", draft.name)).await? {
            if !name.trim().is_empty() {
                draft.name = name.trim().to_string();
            }
        }

        let key_hint = if draft.api_key.is_empty() {
            "não configurada"
        } else {
            "configurada"
        };
        if let Some(key) = read_line(lines, &format!("Gemini API Key [{key_hint}]: ")).await? {
            if !key.trim().is_empty() {
                draft.api_key = key.trim().to_string();
            }
        }

        let palette: Vec<&str> = ThemeColor::ALL.iter().map(|t| t.style().label).collect();
        let prompt = format!(
            "Paleta de cores ({}) [{}]: ",
            palette.join(", "),
            draft.theme_color.style().label
        );
        if let Some(choice) = read_line(lines, &prompt).await? {
            if !choice.trim().is_empty() {
                match ThemeColor::parse(&choice) {
                    Some(theme) => draft.theme_color = theme,
                    None => println!("Cor desconhecida, mantendo a atual."),
                }
            }
        }

        let Some(confirm) = read_line(lines, "Salvar preferências? (s/n): ").await? else {
            return Ok(false);
        };
        if confirm.trim().eq_ignore_ascii_case("s") {
            match self.store.save(&draft) {
                Ok(()) => {
                    self.settings = draft;
                    println!("{}", "Preferências salvas.".color(self.accent()));
                }
                Err(e) => {
                    warn!("failed to persist settings: {e:#}");
                    println!("{}", "Não foi possível salvar as preferências.".color(ERROR_COLOR));
                }
            }
            self.navigate(Nav::SettingsSaved);
        } else {
            println!("Alterações descartadas.");
            self.navigate(Nav::SettingsCancelled);
        }
        Ok(true)
    }

    async fn project_screen(&mut self, lines: &mut InputLines) -> Result<bool> {
        self.drain_extractions(false).await;
        self.render_project_status();

        let Some(input) = read_line(lines, "comando> ").await? else {
            return Ok(false);
        };
        let input = input.trim();
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match command {
            "vaga" => {
                let text = read_block(lines).await?;
                self.project.set_job_description(text);
            }
            "curriculo" | "currículo" => {
                if arg.is_empty() {
                    println!("Uso: curriculo <caminho/do/arquivo.pdf>");
                } else {
                    self.start_upload(arg);
                }
            }
            "remover" => self.project.remove_resume(),
            "analisar" => self.run_analysis().await,
            "resultado" => match self.project.result() {
                Some(result) => self.render_result(&result.clone()),
                None => println!("Nenhuma análise disponível ainda."),
            },
            "copiar" => self.copy_post(),
            "buscar" => self.open_job_search(),
            "config" => self.navigate(Nav::SettingsOpened),
            "sair" => self.navigate(Nav::LoggedOut),
            "encerrar" | "quit" => return Ok(false),
            "" => {}
            _ => print_help(),
        }
        Ok(true)
    }

    fn render_project_status(&self) {
        let accent = self.accent();
        println!();
        println!(
            "{} — Bem-vindo, {}",
            "MatchSkill".color(accent).bold(),
            self.settings.name.color(accent)
        );

        let job_status = if self.project.job_description().trim().is_empty() {
            "vazia".to_string()
        } else {
            format!("{} caracteres", self.project.job_description().len())
        };
        println!("  Vaga: {job_status}");

        match self.project.file_name() {
            Some(name) if self.project.extracting() => println!("  Currículo: {name} (Lendo PDF...)"),
            Some(name) => println!("  Currículo: {name} (Extração completa!)"),
            None => println!("  Currículo: nenhum arquivo"),
        }

        if let Some(error) = self.project.error() {
            println!("  {}", error.color(ERROR_COLOR));
        }
        println!("  Comandos: vaga | curriculo <pdf> | remover | analisar | resultado | copiar | buscar | config | sair | encerrar");
    }

    fn start_upload(&mut self, raw_path: &str) {
        let path = PathBuf::from(raw_path);
        let Some(job) = self.project.begin_upload(&path) else {
            return;
        };

        info!("extracting resume from {}", job.path.display());
        let ExtractionJob { file_name, path } = job;
        let handle = tokio::spawn(async move { extractor::extract(&path).await });
        self.extractions.push((file_name, handle));
    }

    /// Applies finished extraction tasks to the view. With `wait` the call
    /// blocks until every in-flight extraction has completed; staleness is
    /// decided by the view, not by arrival order.
    async fn drain_extractions(&mut self, wait: bool) {
        let handles: Vec<ExtractionHandle> = self.extractions.drain(..).collect();
        for (file_name, handle) in handles {
            if wait || handle.is_finished() {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(AppError::ExtractionFailed(format!(
                        "extraction task aborted: {e}"
                    ))),
                };
                self.project.apply_extraction(&file_name, outcome);
            } else {
                self.extractions.push((file_name, handle));
            }
        }
    }

    async fn run_analysis(&mut self) {
        // Extraction must settle first; analysis needs the resume text.
        self.drain_extractions(true).await;

        let Some(request) = self.project.begin_analysis(&self.settings) else {
            return;
        };

        println!("{}", "Processando IA...".color(self.accent()));
        let outcome = self
            .analyzer
            .analyze(
                &request.job_description,
                &request.resume_text,
                &request.api_key,
            )
            .await;

        let succeeded = outcome.is_ok();
        self.project.apply_analysis(outcome);
        if succeeded {
            // Bring the fresh report into view right away.
            if let Some(result) = self.project.result() {
                self.render_result(&result.clone());
            }
        }
    }

    fn render_result(&self, result: &AnalysisResult) {
        let accent = self.accent();
        println!();
        println!("{}", "Análise Estratégica Finalizada".color(accent).bold());

        render_section(
            "Pontos Fortes",
            ThemeColor::Emerald.style().accent,
            &result.strengths,
        );
        render_section(
            "Gaps Identificados",
            ThemeColor::Amber.style().accent,
            &result.weaknesses,
        );
        render_section(
            "Próximos Passos",
            ThemeColor::Indigo.style().accent,
            &result.improvement_plan,
        );

        println!();
        println!("{}", "Hack de Entrevista".color(accent).bold());
        for (i, tip) in result.interview_tips.iter().enumerate() {
            println!("  {}. {tip}", i + 1);
        }

        if let Some(post) = &result.linkedin_post {
            println!();
            println!("{}", "LinkedIn Power Post".color(accent).bold());
            println!("{post}");
            println!("  ('copiar' envia o texto para a área de transferência)");
        }

        if let Some(query) = &result.job_search_query {
            println!();
            println!("{}", "Busca Otimizada".color(accent).bold());
            println!("  \"{query}\"  ('buscar' abre as vagas no LinkedIn)");
        }
    }

    fn copy_post(&self) {
        let Some(post) = self.project.linkedin_post() else {
            println!("Nenhum rascunho de post disponível. Rode uma análise primeiro.");
            return;
        };

        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(post.to_string())) {
            Ok(()) => println!("{}", "Copiado!".color(self.accent()).bold()),
            Err(e) => {
                warn!("clipboard write failed: {e}");
                println!("{}", "Não foi possível copiar o texto.".color(ERROR_COLOR));
            }
        }
    }

    fn open_job_search(&self) {
        let Some(url) = self.project.job_search_url() else {
            println!("Nenhum termo de busca disponível. Rode uma análise primeiro.");
            return;
        };
        open_in_browser(&url);
    }

    fn navigate(&mut self, event: Nav) {
        self.screen = self.screen.transition(event);
    }
}

async fn read_line(lines: &mut InputLines, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Reads a multi-line block, terminated by a line containing only `.`.
async fn read_block(lines: &mut InputLines) -> Result<String> {
    println!("Cole a descrição da vaga. Termine com uma linha contendo apenas '.':");
    let mut buf = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            break;
        }
        buf.push(line);
    }
    Ok(buf.join("\n"))
}

fn print_help() {
    println!("Comandos disponíveis:");
    println!("  vaga              cola a descrição da vaga");
    println!("  curriculo <pdf>   envia seu currículo em PDF");
    println!("  remover           remove o currículo enviado");
    println!("  analisar          gera o relatório de match");
    println!("  resultado         mostra o último relatório");
    println!("  copiar            copia o post do LinkedIn");
    println!("  buscar            abre a busca de vagas no navegador");
    println!("  config            abre os ajustes");
    println!("  sair              volta para a tela de login");
    println!("  encerrar          fecha o aplicativo");
}

fn render_section(title: &str, color: Color, items: &[String]) {
    println!();
    println!("{}", title.color(color).bold());
    for item in items {
        println!("  • {item}");
    }
}

/// Opens the URL in a new browsing context via the platform launcher.
fn open_in_browser(url: &str) {
    println!("Abrindo busca de vagas: {url}");
    let spawned = if cfg!(target_os = "windows") {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open").arg(url).spawn()
    } else {
        std::process::Command::new("xdg-open").arg(url).spawn()
    };

    if let Err(e) = spawned {
        warn!("failed to open browser: {e}");
        println!("Abra manualmente: {url}");
    }
}
