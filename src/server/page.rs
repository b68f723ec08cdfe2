use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Virtual Assistant</title>
<style>
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
#log { border: 1px solid #ccc; height: 24rem; overflow-y: auto; padding: .5rem; white-space: pre-wrap; }
.you { color: #555; }
</style>
</head>
<body>
<h1>Virtual Assistant</h1>
<div id="log"></div>
<form id="chat">
  <input id="message" autocomplete="off" placeholder="Say something" size="40">
  <button>Send</button>
</form>
<form id="upload">
  <input type="file" name="file">
  <button>Upload</button>
</form>
<script>
const log = document.getElementById("log");
function say(who, text) {
  const line = document.createElement("div");
  line.className = who;
  line.textContent = (who === "you" ? "You: " : "Assistant: ") + text;
  log.appendChild(line);
  log.scrollTop = log.scrollHeight;
}
document.getElementById("chat").addEventListener("submit", async (e) => {
  e.preventDefault();
  const input = document.getElementById("message");
  const message = input.value;
  input.value = "";
  say("you", message);
  const res = await fetch("/chat", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ message }),
  });
  const data = await res.json();
  say("bot", data.reply ?? data.text);
});
document.getElementById("upload").addEventListener("submit", async (e) => {
  e.preventDefault();
  const res = await fetch("/upload", { method: "POST", body: new FormData(e.target) });
  const data = await res.json();
  say("bot", data.caption ?? data.message ?? data.status);
});
</script>
</body>
</html>
"#;

/// Minimal chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> &'static str {
    "Server is running!"
}
