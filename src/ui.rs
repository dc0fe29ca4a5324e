use crate::dates::full_day_label;
use crate::models::{DailyRecord, HistoryResponse};

pub fn render_index(today: &DailyRecord, history: &HistoryResponse) -> String {
    let disabled = if today.count == 0 { "disabled" } else { "" };
    let date_label = escape_html(&full_day_label(&today.date));
    INDEX_HTML
        .replace("{{DATE_LABEL}}", &date_label)
        .replace("{{COUNT}}", &today.count.to_string())
        .replace("{{DEC_DISABLED}}", disabled)
        .replace("{{DAYS}}", &history.entries.len().to_string())
        .replace("{{TOTAL}}", &history.total.to_string())
        .replace("{{AVERAGE}}", &history.average.to_string())
        .replace("{{HISTORY_ROWS}}", &render_rows(history))
}

fn render_rows(history: &HistoryResponse) -> String {
    if history.entries.is_empty() {
        return r#"<li class="empty">No history yet. Days roll in here after midnight.</li>"#.to_owned();
    }
    history
        .entries
        .iter()
        .map(|entry| {
            format!(
                r#"<li><span class="day" title="{date}">{label}<small>{full}</small></span><span class="tally">{count}</span></li>"#,
                date = escape_html(&entry.date),
                label = escape_html(&entry.label),
                full = escape_html(&entry.full_label),
                count = entry.count,
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Counter</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 16px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease, opacity 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
      font-family: inherit;
    }

    button:active {
      transform: scale(0.98);
    }

    button:disabled {
      opacity: 0.4;
      cursor: not-allowed;
      transform: none;
    }

    .tab {
      background: transparent;
      padding: 8px 16px;
      font-size: 0.9rem;
      color: #6b645d;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .screen {
      display: grid;
      gap: 24px;
    }

    .screen[hidden] {
      display: none;
    }

    .date-badge {
      justify-self: center;
      padding: 8px 16px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
      font-weight: 500;
    }

    .count-circle {
      justify-self: center;
      width: 220px;
      height: 220px;
      border-radius: 50%;
      background: white;
      border: 1px solid rgba(47, 72, 88, 0.08);
      box-shadow: 0 18px 40px rgba(255, 107, 74, 0.18);
      display: grid;
      place-content: center;
      text-align: center;
      gap: 4px;
    }

    .count-number {
      font-family: "Fraunces", "Georgia", serif;
      font-size: 4.2rem;
      color: var(--accent);
      line-height: 1;
    }

    .count-label,
    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .controls {
      display: grid;
      grid-template-columns: auto 1fr auto;
      align-items: center;
      gap: 16px;
    }

    .quick-actions {
      display: flex;
      justify-content: center;
      gap: 10px;
    }

    .btn-round {
      width: 64px;
      height: 64px;
      padding: 0;
      font-size: 1.8rem;
      color: white;
    }

    .btn-add {
      background: var(--accent);
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-sub {
      background: var(--accent-2);
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    .btn-quick {
      background: white;
      color: var(--accent-2);
      border: 1px solid rgba(47, 72, 88, 0.15);
      padding: 12px 18px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .history-header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .backup {
      display: flex;
      gap: 10px;
    }

    a.btn-quick {
      display: inline-flex;
      align-items: center;
      border-radius: 999px;
      font-weight: 600;
      text-decoration: none;
    }

    .backup .btn-quick {
      padding: 10px 16px;
      font-size: 0.9rem;
    }

    .history-list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .history-list li {
      display: flex;
      justify-content: space-between;
      align-items: center;
      background: white;
      border-radius: 16px;
      padding: 14px 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .history-list li.empty {
      justify-content: center;
      color: #8b857d;
    }

    .history-list .day {
      display: grid;
      gap: 2px;
    }

    .history-list .day small {
      color: #8b857d;
      font-size: 0.8rem;
    }

    .history-list .tally {
      font-weight: 600;
      color: var(--accent);
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      .controls {
        grid-template-columns: 1fr;
        justify-items: center;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Daily Counter</h1>
        <p class="subtitle">Track your daily progress.</p>
      </div>
      <nav class="tabs" role="tablist">
        <button class="tab active" type="button" data-view="today" role="tab" aria-selected="true">Today</button>
        <button class="tab" type="button" data-view="history" role="tab" aria-selected="false">History</button>
      </nav>
    </header>

    <section class="screen" id="view-today">
      <span class="date-badge">{{DATE_LABEL}}</span>
      <div class="count-circle">
        <span class="count-number" id="count">{{COUNT}}</span>
        <span class="count-label">Today's count</span>
      </div>
      <div class="controls">
        <form id="dec-form" method="post" action="/counter/decrement">
          <button class="btn-round btn-sub" id="dec-btn" type="submit" aria-label="Decrease count" {{DEC_DISABLED}}>&minus;</button>
        </form>
        <div class="quick-actions">
          <button class="btn-quick" type="button" data-amount="5" aria-label="Add 5">+5</button>
          <button class="btn-quick" type="button" data-amount="10" aria-label="Add 10">+10</button>
        </div>
        <form id="inc-form" method="post" action="/counter/increment">
          <button class="btn-round btn-add" id="inc-btn" type="submit" aria-label="Increase count">+</button>
        </form>
      </div>
    </section>

    <section class="screen" id="view-history" hidden>
      <div class="panel">
        <div class="stat">
          <span class="label">Days tracked</span>
          <span class="value" id="days">{{DAYS}}</span>
        </div>
        <div class="stat">
          <span class="label">Total</span>
          <span class="value" id="total">{{TOTAL}}</span>
        </div>
        <div class="stat">
          <span class="label">Daily average</span>
          <span class="value" id="average">{{AVERAGE}}</span>
        </div>
      </div>
      <div class="history-header">
        <h2>Past days</h2>
        <div class="backup">
          <a class="btn-quick" href="/api/export" download>Export</a>
          <button class="btn-quick" type="button" id="import-btn">Import</button>
          <input type="file" id="import-file" accept="application/json" hidden />
        </div>
      </div>
      <ul class="history-list" id="history">
        {{HISTORY_ROWS}}
      </ul>
    </section>

    <div class="status" id="status"></div>
    <p class="hint">Counts roll into history at local midnight (server time). Imports never overwrite existing days.</p>
  </main>

  <script>
    const countEl = document.getElementById('count');
    const decBtn = document.getElementById('dec-btn');
    const statusEl = document.getElementById('status');
    const daysEl = document.getElementById('days');
    const totalEl = document.getElementById('total');
    const averageEl = document.getElementById('average');
    const historyEl = document.getElementById('history');
    const importBtn = document.getElementById('import-btn');
    const importFile = document.getElementById('import-file');
    const tabs = Array.from(document.querySelectorAll('.tab'));
    const screens = {
      today: document.getElementById('view-today'),
      history: document.getElementById('view-history')
    };

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const updateToday = (data) => {
      countEl.textContent = data.count;
      decBtn.disabled = data.count <= 0;
    };

    const renderHistory = (data) => {
      daysEl.textContent = data.entries.length;
      totalEl.textContent = data.total;
      averageEl.textContent = data.average;
      historyEl.replaceChildren();
      if (!data.entries.length) {
        const empty = document.createElement('li');
        empty.className = 'empty';
        empty.textContent = 'No history yet. Days roll in here after midnight.';
        historyEl.appendChild(empty);
        return;
      }
      data.entries.forEach((entry) => {
        const row = document.createElement('li');
        const day = document.createElement('span');
        day.className = 'day';
        day.title = entry.date;
        day.textContent = entry.label;
        const full = document.createElement('small');
        full.textContent = entry.full_label;
        day.appendChild(full);
        const tally = document.createElement('span');
        tally.className = 'tally';
        tally.textContent = entry.count;
        row.append(day, tally);
        historyEl.appendChild(row);
      });
    };

    const loadToday = async () => {
      const res = await fetch('/api/today');
      if (!res.ok) {
        throw new Error('Unable to load today');
      }
      updateToday(await res.json());
    };

    const loadHistory = async () => {
      const res = await fetch('/api/history');
      if (!res.ok) {
        throw new Error('Unable to load history');
      }
      renderHistory(await res.json());
    };

    const send = async (action, amount) => {
      const res = await fetch('/api/counter', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ action, amount })
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      updateToday(await res.json());
    };

    const setView = (view) => {
      tabs.forEach((button) => {
        const isActive = button.dataset.view === view;
        button.classList.toggle('active', isActive);
        button.setAttribute('aria-selected', String(isActive));
      });
      Object.entries(screens).forEach(([name, el]) => {
        el.hidden = name !== view;
      });
      setStatus('', '');
      const load = view === 'history' ? loadHistory : loadToday;
      load().catch((err) => setStatus(err.message, 'error'));
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => setView(button.dataset.view));
    });

    document.getElementById('inc-form').addEventListener('submit', (event) => {
      event.preventDefault();
      send('increment', 1).catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('dec-form').addEventListener('submit', (event) => {
      event.preventDefault();
      send('decrement', 1).catch((err) => setStatus(err.message, 'error'));
    });

    document.querySelectorAll('[data-amount]').forEach((button) => {
      button.addEventListener('click', () => {
        send('increment', Number(button.dataset.amount)).catch((err) => setStatus(err.message, 'error'));
      });
    });

    importBtn.addEventListener('click', () => importFile.click());

    importFile.addEventListener('change', async () => {
      const file = importFile.files && importFile.files[0];
      if (!file) {
        return;
      }
      try {
        const res = await fetch('/api/import', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: await file.text()
        });
        if (!res.ok) {
          throw new Error('Invalid backup file.');
        }
        const report = await res.json();
        alert(report.message);
        await loadHistory();
      } catch (err) {
        alert(err.message || 'Invalid backup file.');
      } finally {
        importFile.value = '';
      }
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryEntry;

    fn history(entries: Vec<HistoryEntry>) -> HistoryResponse {
        let total: u64 = entries.iter().map(|entry| entry.count).sum();
        HistoryResponse {
            average: if entries.is_empty() { 0 } else { total / entries.len() as u64 },
            entries,
            total,
        }
    }

    #[test]
    fn disables_decrement_at_zero() {
        let page = render_index(&DailyRecord::new("2024-01-01", 0), &history(vec![]));
        assert!(page.contains(r#"aria-label="Decrease count" disabled>"#));
        assert!(page.contains("Monday, January 1, 2024"));
        assert!(page.contains("No history yet"));

        let page = render_index(&DailyRecord::new("2024-01-01", 3), &history(vec![]));
        assert!(page.contains(r#"aria-label="Decrease count" >"#));
        assert!(page.contains(r#"id="count">3<"#));
    }

    #[test]
    fn history_rows_show_full_date() {
        let rows = history(vec![HistoryEntry {
            date: "2024-01-01".into(),
            count: 2,
            label: "Mon, Jan 1".into(),
            full_label: "Monday, January 1, 2024".into(),
        }]);
        let page = render_index(&DailyRecord::new("2024-01-02", 0), &rows);
        assert!(page.contains("Mon, Jan 1<small>Monday, January 1, 2024</small>"));
        assert!(page.contains(r#"<a class="btn-quick" href="/api/export" download>Export</a>"#));
    }

    #[test]
    fn history_rows_are_escaped() {
        let rows = history(vec![HistoryEntry {
            date: "<b>odd</b>".into(),
            count: 4,
            label: "<b>odd</b>".into(),
            full_label: "<b>odd</b>".into(),
        }]);
        let page = render_index(&DailyRecord::new("2024-01-02", 0), &rows);
        assert!(page.contains("&lt;b&gt;odd&lt;/b&gt;"));
        assert!(!page.contains("<b>odd</b>"));
        assert!(page.contains(r#"<span class="tally">4</span>"#));
        assert!(!page.contains("<a href=\"/api/export\" download><button"));
        assert!(!page.contains("{{"));
    }
}
