//! Fixed user-facing texts.

/// Reply to an accepted submission.
pub const SAVED: &str =
    "✅ Данные сохранены. Итог будет отправлен в {time} или по команде /отчет.";

/// Reply to a rejected submission.
pub const FORMAT_INVALID: &str = "❌ Неверный формат строки:\n`Фамилия И - X/Y/Z`";

/// Posted to the group when nobody reported during the cycle.
pub const NO_REPORT: &str = "❗️На сегодня отчёт не предоставлен.";

/// Reply to a manual publish that reached the group.
pub const REPORT_SENT: &str = "✅ Отчёт отправлен в группу.";

/// Reply to a manual publish whose delivery failed.
pub const REPORT_FAILED: &str =
    "⚠️ Не удалось отправить отчёт в группу. Данные сохранены, попробуйте позже.";

/// `/start` greeting.
pub const GREETING: &str = "👋 Привет! Я бот для сбора отчётов сотрудников.\n\n\
📥 Каждый день до {time} отправьте мне данные о сотрудниках в формате:\n\
`Фамилия И - X/Y/Z`\n\n\
🔹 X — количество оплат\n\
🔹 Y — количество звонков\n\
🔹 Z — процент выполненного плана\n\n\
📌 Пример:\n\
`Иванов И - 2/45/87`\n\n\
✅ В {time} я автоматически отправлю итог в рабочую группу.\n\
Также можно вручную вызвать отчёт командой /отчет";

/// Fill the `{time}` placeholder of a template.
pub fn with_time(template: &str, time: &str) -> String {
    template.replace("{time}", time)
}

/// `/chatid` reply.
pub fn chat_id(chat_id: &str) -> String {
    format!("🆔 Chat ID этой группы: `{chat_id}`")
}
