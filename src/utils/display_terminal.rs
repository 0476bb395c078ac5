//! 터미널 출력 포맷팅 유틸리티
//!
//! 호스트 바이너리가 시작할 때 출력하는 박스 제목, 진행 단계, 프로바이더 요약을 만듭니다.
//! `format_*` 함수는 문자열만 만들고 `print_*` 함수가 표준 출력에 씁니다.

/// 박스 내부 콘텐츠 너비
const CONTENT_WIDTH: usize = 50;

/// 박스 형태로 둘러싸인 제목을 만듭니다
///
/// 텍스트는 자동으로 중앙 정렬됩니다.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                  Runtime Started                 ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn format_boxed_title(title: &str) -> String {
    let border = "═".repeat(CONTENT_WIDTH);
    format!(
        "╔{border}╗\n║{title:^width$}║\n╚{border}╝",
        border = border,
        title = title,
        width = CONTENT_WIDTH
    )
}

pub fn print_boxed_title(title: &str) {
    println!("{}", format_boxed_title(title));
}

/// 진행 단계 시작 줄
///
/// ```text
/// → Step 1: Registering providers
/// ```
pub fn format_step_start(step: u8, description: &str) -> String {
    format!("→ Step {}: {}", step, description)
}

pub fn print_step_start(step: u8, description: &str) {
    println!("{}", format_step_start(step, description));
}

/// 진행 단계 완료 줄
///
/// ```text
/// ✓ Step 1: Providers registered (5 items)
/// ```
pub fn format_step_complete(step: u8, description: &str, count: usize) -> String {
    format!("✓ Step {}: {} ({} items)", step, description, count)
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("{}", format_step_complete(step, description, count));
}

/// 들여쓰기된 서브 작업 줄
///
/// ```text
///    ├─ ExceptionServiceProvider: registered
/// ```
pub fn format_sub_task(name: &str, status: &str) -> String {
    format!("   ├─ {}: {}", name, status)
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("{}", format_sub_task(name, status));
}

/// 최종 요약
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║               🎉 RUNTIME READY                   ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Providers: 3
///    🔧 Bindings: 12
///    🧅 Middleware: 2
/// ```
pub fn format_final_summary(providers: usize, bindings: usize, middleware: usize) -> String {
    format!(
        "{}\n   📦 Providers: {}\n   🔧 Bindings: {}\n   🧅 Middleware: {}",
        format_boxed_title("🎉 RUNTIME READY"),
        providers,
        bindings,
        middleware
    )
}

pub fn print_final_summary(providers: usize, bindings: usize, middleware: usize) {
    println!();
    println!("{}", format_final_summary(providers, bindings, middleware));
    println!();
}
