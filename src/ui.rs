pub fn render_index(today: &str) -> String {
    INDEX_HTML.replace("{{TODAY}}", today)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Goal Ledger</title>
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
      width: min(900px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #5f5c57;
    }

    form.row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    input {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 12px;
      padding: 10px 12px;
      font: inherit;
    }

    input[type="number"] {
      width: 90px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    button.ghost {
      background: transparent;
      color: #c63b2b;
      padding: 4px 8px;
    }

    .goal {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 10px;
      margin-bottom: 14px;
    }

    .goal header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
      gap: 10px;
    }

    .bar {
      height: 10px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .sub {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .muted {
      color: #8b857d;
      font-size: 0.9rem;
    }

    #chart {
      width: 100%;
      height: 280px;
      display: block;
      background: white;
      border-radius: 20px;
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hidden {
      display: none;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Goal Ledger</h1>
      <p class="subtitle">Weighted sub-goals, automatic progress. Today is {{TODAY}}.</p>
    </header>

    <section id="auth">
      <h2>Sign in</h2>
      <form id="auth-form" class="row">
        <input id="username" placeholder="Username" autocomplete="username" required />
        <input id="password" type="password" placeholder="Password" autocomplete="current-password" />
        <button type="submit" data-mode="login">Log in</button>
        <button type="submit" class="secondary" data-mode="register">Register</button>
      </form>
    </section>

    <section id="workspace" class="hidden">
      <h2>New goal</h2>
      <form id="goal-form" class="row">
        <input id="goal-title" placeholder="Goal title" required />
        <input id="goal-due" type="date" min="{{TODAY}}" />
        <button type="submit">Add goal</button>
        <button type="button" class="secondary" id="export-btn">Export</button>
        <label class="muted">Import <input id="import-file" type="file" accept="application/json" /></label>
      </form>

      <h2 style="margin-top: 24px">Goals</h2>
      <div id="goals"></div>

      <h2>Progress chart</h2>
      <form class="row" id="chart-form">
        <select id="chart-kind">
          <option value="bar">Bar</option>
          <option value="pie">Pie</option>
          <option value="line">Line</option>
        </select>
        <span class="muted" id="summary"></span>
      </form>
      <svg id="chart" viewBox="0 0 600 280" aria-label="Goal progress chart" role="img"></svg>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    let session = null;
    const statusEl = document.getElementById('status');
    const goalsEl = document.getElementById('goals');
    const chartEl = document.getElementById('chart');
    const kindEl = document.getElementById('chart-kind');
    const summaryEl = document.getElementById('summary');
    const palette = ['#ff6b4a', '#2f4858', '#f5a65b', '#4f9d69', '#8c6ad8', '#d65db1'];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeHtml = (text) => text.replace(/[&<>"']/g, (c) => `&#${c.charCodeAt(0)};`);

    const api = async (method, path, body) => {
      const headers = { 'content-type': 'application/json' };
      if (session) {
        headers['x-goal-user'] = session.username;
        headers['x-goal-password'] = session.password;
      }
      const res = await fetch(path, { method, headers, body: body === undefined ? undefined : JSON.stringify(body) });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const renderGoals = (goals) => {
      if (!goals.length) {
        goalsEl.innerHTML = '<p class="muted">No goals yet.</p>';
        return;
      }
      goalsEl.innerHTML = goals.map((goal) => `
        <article class="goal" data-goal="${goal.id}">
          <header>
            <strong>${escapeHtml(goal.title)}</strong>
            <span class="muted">${goal.due ? 'due ' + goal.due : 'no deadline'} · ${goal.progress}%</span>
            <button class="ghost" data-action="delete-goal">Delete</button>
          </header>
          <div class="bar"><span style="width: ${goal.progress}%"></span></div>
          ${goal.submetas.map((sub) => `
            <label class="sub" data-sub="${sub.id}">
              <input type="checkbox" data-action="toggle" ${sub.done ? 'checked' : ''} />
              ${escapeHtml(sub.title)} <span class="muted">${sub.points} pt${sub.points === 1 ? '' : 's'}${sub.due ? ' · ' + sub.due : ''}</span>
              <button class="ghost" data-action="delete-sub">×</button>
            </label>`).join('')}
          <form class="row" data-action="add-sub">
            <input name="title" placeholder="Sub-goal" required />
            <input name="points" type="number" min="1" value="1" />
            <input name="due" type="date" />
            <button type="submit" class="secondary">Add sub-goal</button>
          </form>
        </article>`).join('');
    };

    const renderChart = (report) => {
      const points = report.points;
      const s = report.summary;
      summaryEl.textContent = `${s.goal_count} goals · ${s.completed} done · avg ${s.average_progress}% · ${s.overdue} overdue`;
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No goals yet</text>';
        return;
      }
      const width = 600, height = 280, pad = 40;
      if (report.kind === 'pie') {
        const total = points.reduce((acc, p) => acc + p.progress, 0) || 1;
        let angle = -Math.PI / 2;
        chartEl.innerHTML = points.map((p, i) => {
          const slice = (p.progress / total) * Math.PI * 2;
          const large = slice > Math.PI ? 1 : 0;
          const [cx, cy, r] = [width / 2, height / 2, 110];
          const x1 = cx + r * Math.cos(angle), y1 = cy + r * Math.sin(angle);
          angle += slice;
          const x2 = cx + r * Math.cos(angle), y2 = cy + r * Math.sin(angle);
          return `<path d="M ${cx} ${cy} L ${x1} ${y1} A ${r} ${r} 0 ${large} 1 ${x2} ${y2} Z" fill="${palette[i % palette.length]}"><title>${escapeHtml(p.title)}: ${p.progress}%</title></path>`;
        }).join('');
        return;
      }
      const step = (width - pad * 2) / Math.max(points.length, 1);
      const y = (v) => height - pad - (v / 100) * (height - pad * 2);
      const labels = points.map((p, i) => `<text class="chart-label" x="${pad + step * (i + 0.5)}" y="${height - 14}" text-anchor="middle">${escapeHtml(p.title).slice(0, 14)}</text>`).join('');
      if (report.kind === 'line') {
        const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${pad + step * (i + 0.5)} ${y(p.progress)}`).join(' ');
        chartEl.innerHTML = `<path d="${path}" fill="none" stroke="#ff6b4a" stroke-width="3" />${labels}`;
        return;
      }
      chartEl.innerHTML = points.map((p, i) => `<rect x="${pad + step * i + step * 0.15}" y="${y(p.progress)}" width="${step * 0.7}" height="${height - pad - y(p.progress)}" rx="6" fill="${p.overdue ? '#c63b2b' : '#ff6b4a'}"><title>${p.progress}%</title></rect>`).join('') + labels;
    };

    const refresh = async () => {
      const [goals, report] = await Promise.all([
        api('GET', '/api/goals'),
        api('GET', `/api/report?kind=${kindEl.value}`)
      ]);
      renderGoals(goals);
      renderChart(report);
    };

    const run = (promise) => promise.then(refresh).catch((err) => setStatus(err.message, 'error'));

    document.getElementById('auth-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const mode = event.submitter ? event.submitter.dataset.mode : 'login';
      const creds = {
        username: document.getElementById('username').value.trim(),
        password: document.getElementById('password').value
      };
      const path = mode === 'register' ? '/api/users' : '/api/login';
      api('POST', path, creds)
        .then(() => {
          session = creds;
          document.getElementById('auth').classList.add('hidden');
          document.getElementById('workspace').classList.remove('hidden');
          setStatus(`Signed in as ${creds.username}`, 'ok');
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('goal-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const title = document.getElementById('goal-title').value;
      const due = document.getElementById('goal-due').value || null;
      run(api('POST', '/api/goals', { title, due }));
      event.target.reset();
    });

    goalsEl.addEventListener('click', (event) => {
      const action = event.target.dataset.action;
      const goalId = event.target.closest('[data-goal]')?.dataset.goal;
      const subId = event.target.closest('[data-sub]')?.dataset.sub;
      if (action === 'delete-goal') {
        run(api('DELETE', `/api/goals/${goalId}`));
      } else if (action === 'delete-sub') {
        event.preventDefault();
        run(api('DELETE', `/api/goals/${goalId}/subgoals/${subId}`));
      }
    });

    goalsEl.addEventListener('change', (event) => {
      if (event.target.dataset.action !== 'toggle') {
        return;
      }
      const goalId = event.target.closest('[data-goal]').dataset.goal;
      const subId = event.target.closest('[data-sub]').dataset.sub;
      run(api('PUT', `/api/goals/${goalId}/subgoals/${subId}`, { done: event.target.checked }));
    });

    goalsEl.addEventListener('submit', (event) => {
      event.preventDefault();
      const form = event.target;
      const goalId = form.closest('[data-goal]').dataset.goal;
      run(api('POST', `/api/goals/${goalId}/subgoals`, {
        title: form.querySelector('[name="title"]').value,
        points: Number(form.querySelector('[name="points"]').value) || null,
        due: form.querySelector('[name="due"]').value || null
      }));
    });

    kindEl.addEventListener('change', () => run(Promise.resolve()));

    document.getElementById('export-btn').addEventListener('click', async () => {
      try {
        const backup = await api('GET', '/api/export');
        const blob = new Blob([JSON.stringify(backup, null, 2)], { type: 'application/json' });
        const link = document.createElement('a');
        link.href = URL.createObjectURL(blob);
        link.download = `goals-${session.username}.json`;
        link.click();
        URL.revokeObjectURL(link.href);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      try {
        const backup = JSON.parse(await file.text());
        await run(api('POST', '/api/import', backup));
        setStatus('Imported', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
      event.target.value = '';
    });
  </script>
</body>
</html>
"##;
