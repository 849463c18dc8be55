//! The instruction that turns a filter's base query into a full image prompt.

/// Builds the meta-instruction sent to the text model for `style`.
pub fn style_prompt_instructions(style: &str) -> String {
    let style = style.trim();
    let mut s = String::new();
    s.push_str(
        r#"You are a world-class prompt engineer for AI image transformation. Write one richly detailed prompt, in English, that tells an image generation model how to restyle a user's photo while keeping the photo's subject and composition intact.

What the prompt must cover:
1. Style: apply the requested style to the existing image and describe it vividly.
2. Lighting: for example dramatic chiaroscuro, soft diffused light, neon glow, sun-drenched.
3. Color palette: for example muted monochrome, vibrant complementary colors, vintage sepia.
4. Texture and brushwork: for example thick impasto, smooth digital finish, grainy film, watercolor bleed.
5. Atmosphere and mood: for example ethereal and dreamlike, gritty and dystopian, nostalgic and serene.
6. Quality: finish with strong quality keywords such as "masterpiece, 8k resolution, intricate details, professional lighting, ultra-detailed".

Output rules:
- Output the prompt text only.
- No preamble, explanation, heading or quotation marks.
- A single coherent paragraph.

Example for "Epic Fantasy Film":
Transform the image to look like a cinematic still from an epic fantasy film. The lighting should be magical and ethereal, with soft, glowing highlights and deep, dramatic shadows. The color palette should be rich and saturated, with deep greens, royal blues, and hints of gold. Infuse the atmosphere with a sense of wonder and ancient magic. Render with photorealistic quality, intricate details, professional cinematography, masterpiece, 8k resolution, ultra-detailed."#,
    );
    s.push_str("\n\nRequested style: \"");
    s.push_str(style);
    s.push('"');
    s
}
