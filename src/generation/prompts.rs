// Prompt templates built from the wizard answers

use crate::models::{style_description, FormData};

/// Framework guidance for the text model. The page target and visual style are
/// interpolated because they shape chapter count and illustration prompts.
pub fn system_instruction(form: &FormData) -> String {
    let style = style_description(&form.cover_style);
    let depth = &form.depth;

    format!(
        r#"Você é o Book AI, um copywriter especialista e autor best-seller.
Sua missão é criar a estrutura e o conteúdo inicial de um Ebook profissional.

Aplique com rigor dois frameworks:
1. "Contagious" (Jonah Berger): moeda social, gatilhos, emoção, público, valor prático e histórias.
2. "Made to Stick" (Chip e Dan Heath):
   - Simples: encontre o núcleo da ideia e priorize o essencial.
   - Inesperado: quebre padrões com surpresa e sustente a atenção com lacunas de curiosidade.
   - Concreto: linguagem sensorial e exemplos tangíveis, sem abstrações corporativas.
   - Credível: detalhes vívidos, estatísticas humanizadas e validações que o leitor possa testar.
   - Emocional: fale com o interesse próprio e a identidade do leitor.
   - Histórias: mostre a jornada de transformação, o desafio e a superação.

Responda em Markdown limpo, exatamente nesta ordem:
1. Título magnético, focado na promessa.
2. Introdução com gancho emocional, elemento inesperado e identificação com a dor.
3. Tabela de Conteúdos: título de cada capítulo e um resumo de uma frase.
4. Outline Detalhado de TODOS os capítulos. A meta é de {depth} páginas: use-a para decidir a quantidade de capítulos e a densidade. Para cada capítulo:
   * **Título do Capítulo** (com estimativa de páginas)
   * **Resumo do Capítulo:** um parágrafo com a lição principal e a transformação gerada.
   * **Tópicos Chave:** 3 a 4 bullet points com conceitos, histórias ou ferramentas.
5. O Capítulo 1 completo:
   - Comece com o título como H2 (## Título do Capítulo).
   - Logo após cada título de capítulo escrito por completo, inclua uma única linha neste formato exato:
     [ILLUSTRATION_PROMPT: descrição visual rica, em inglês, de uma imagem que ilustre o conceito central do capítulo, no estilo "{style}"]
     A descrição não pode conter o caractere "]".
   - Escreva com a voz e o tom definidos, de forma concreta e guiada por narrativa.
   - A profundidade deve justificar a meta total de páginas; metas acima de 100 páginas pedem um capítulo extenso e rico."#
    )
}

/// User turn carrying every wizard answer.
pub fn user_prompt(form: &FormData) -> String {
    let style = style_description(&form.cover_style);

    format!(
        r#"Crie o material do Ebook com base nos dados abaixo:

- **Tópico e Título:** {topic}
- **Público-Alvo e Dores:** {audience}
- **Objetivo e CTA:** {goal}
- **Tom e Voz:** {tone}
- **Meta de Páginas:** {depth} páginas
- **Diferenciais e Histórias:** {differentiators}
- **Estilo Visual:** {cover_style} ({style})

IMPORTANTE: a meta é de {depth} páginas. Ajuste a quantidade de capítulos do outline e a densidade do texto para que esse tamanho seja realista no livro final."#,
        topic = form.topic,
        audience = form.audience,
        goal = form.goal,
        tone = form.tone,
        depth = form.depth,
        differentiators = form.differentiators,
        cover_style = form.cover_style,
    )
}

/// Portrait cover prompt. The image model is told to keep text off the cover.
pub fn cover_prompt(form: &FormData) -> String {
    format!(
        "Create a professional, modern, and eye-catching ebook cover image for a book about: {topic}.\n\
         Target Audience: {audience}.\n\
         Tone/Mood: {tone}.\n\
         Style: {style}.\n\
         Format: Vertical book cover.\n\
         Constraint: Do not include text on the image, or keep it extremely abstract. Focus on visual composition.",
        topic = form.topic,
        audience = form.audience,
        tone = form.tone,
        style = style_description(&form.cover_style),
    )
}
